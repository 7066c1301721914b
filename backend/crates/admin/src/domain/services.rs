//! Domain Services

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::domain::entities::AdminChallenge;
use crate::domain::value_objects::AdminAddress;
use crate::error::{AdminError, AdminResult};

/// Text shown in the wallet when the admin signs in
pub fn challenge_message(
    address: &AdminAddress,
    challenge_id: &Uuid,
    nonce: &str,
    issued_at: &DateTime<Utc>,
) -> String {
    format!(
        "App Hub admin access\n\nAddress: {}\nChallenge: {}\nNonce: {}\nIssued At: {}",
        address,
        challenge_id,
        nonce,
        issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Check a consumed challenge against the claimed address and signature
pub fn verify_challenge(
    challenge: &AdminChallenge,
    claimed: &AdminAddress,
    signature: &str,
    now_ms: i64,
) -> AdminResult<()> {
    if challenge.is_expired_at(now_ms) {
        return Err(AdminError::ChallengeExpired);
    }
    if &challenge.address != claimed {
        return Err(AdminError::AddressMismatch);
    }
    if !platform::crypto::verify_personal_signature(claimed.as_str(), signature, &challenge.message)? {
        return Err(AdminError::InvalidSignature);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::{address_of, random_signing_key, sign_personal_message};

    fn signed_challenge() -> (AdminChallenge, String) {
        let key = random_signing_key();
        let address = AdminAddress::parse(&address_of(key.verifying_key())).unwrap();
        let challenge = AdminChallenge::new(address, "00ff", 60_000);
        let signature = sign_personal_message(&key, &challenge.message).unwrap();
        (challenge, signature)
    }

    #[test]
    fn test_message_names_address_and_challenge() {
        let address = AdminAddress::parse("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
        let id = Uuid::nil();
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let message = challenge_message(&address, &id, "abcd", &issued);
        assert!(message.contains("Address: 0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"));
        assert!(message.contains("Challenge: 00000000-0000-0000-0000-000000000000"));
        assert!(message.contains("Nonce: abcd"));
        assert!(message.ends_with("Issued At: 2023-11-14T22:13:20Z"));
    }

    #[test]
    fn test_verify_accepts_owner() {
        let (challenge, signature) = signed_challenge();
        let now = challenge.created_at.timestamp_millis();
        assert!(verify_challenge(&challenge, &challenge.address, &signature, now).is_ok());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let (challenge, signature) = signed_challenge();
        let later = challenge.expires_at_ms + 1;
        assert!(matches!(
            verify_challenge(&challenge, &challenge.address, &signature, later),
            Err(AdminError::ChallengeExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_other_address() {
        let (challenge, signature) = signed_challenge();
        let other = AdminAddress::parse("0x0000000000000000000000000000000000000001").unwrap();
        let now = challenge.created_at.timestamp_millis();
        assert!(matches!(
            verify_challenge(&challenge, &other, &signature, now),
            Err(AdminError::AddressMismatch)
        ));
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let (challenge, _) = signed_challenge();
        let intruder = random_signing_key();
        let forged = sign_personal_message(&intruder, &challenge.message).unwrap();
        let now = challenge.created_at.timestamp_millis();
        assert!(matches!(
            verify_challenge(&challenge, &challenge.address, &forged, now),
            Err(AdminError::InvalidSignature)
        ));

        assert!(matches!(
            verify_challenge(&challenge, &challenge.address, "0x1234", now),
            Err(AdminError::InvalidSignature)
        ));
    }
}
