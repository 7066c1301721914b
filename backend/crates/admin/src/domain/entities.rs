//! Domain Entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::services::challenge_message;
use crate::domain::value_objects::AdminAddress;

/// Single-use challenge an admin signs to prove wallet ownership
#[derive(Debug, Clone)]
pub struct AdminChallenge {
    pub id: Uuid,
    pub address: AdminAddress,
    /// Exact text the wallet signs
    pub message: String,
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl AdminChallenge {
    pub fn new(address: AdminAddress, nonce: &str, ttl_ms: i64) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Self {
            id,
            message: challenge_message(&address, &id, nonce, &now),
            address,
            expires_at_ms: now.timestamp_millis() + ttl_ms,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_ms
    }
}
