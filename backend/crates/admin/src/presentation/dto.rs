//! API DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query for GET /api/admin/challenge
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeQuery {
    #[serde(default)]
    pub address: Option<String>,
}

/// Response for GET /api/admin/challenge
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub challenge_id: Uuid,
    pub message: String,
    pub expires_at_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_response_serialization() {
        let response = ChallengeResponse {
            challenge_id: Uuid::nil(),
            message: "sign me".to_string(),
            expires_at_ms: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["challengeId"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["message"], "sign me");
        assert_eq!(json["expiresAtMs"], 1_700_000_000_000i64);
    }
}
