//! Cryptographic Utilities
//!
//! Wallet-compatible signing: messages are hashed the way `personal_sign`
//! does (EIP-191), signatures are 65 bytes `r || s || v` rendered as
//! `0x`-prefixed hex, addresses are the last 20 bytes of the Keccak-256 of
//! the uncompressed public key.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::{RngCore, rngs::OsRng};
use sha3::{Digest, Keccak256};

/// Errors from signature handling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("failed to decode hex: {0}")]
    Hex(String),

    #[error("invalid signature length: got {0}, want 65")]
    Length(usize),

    #[error("invalid recovery id: {0}")]
    RecoveryId(u8),

    #[error("invalid private key")]
    PrivateKey,

    #[error("signature recovery failed")]
    Recovery,
}

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Compute Keccak-256 (the pre-standard SHA-3 padding used by Ethereum)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash of `"\x19Ethereum Signed Message:\n" || len(message) || message`
pub fn personal_message_hash(message: &str) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Decode `0x`-prefixed (or bare) hex
pub fn decode_hex(s: &str) -> Result<Vec<u8>, SignatureError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| SignatureError::Hex(e.to_string()))
}

/// Lowercase `0x`-prefixed address of a verifying key
pub fn address_of(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag
    let hash = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Validate and lowercase a `0x` + 40 hex digit address
pub fn normalize_address(address: &str) -> Option<String> {
    let hex_part = address.strip_prefix("0x")?;
    if hex_part.len() != 40 || !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{}", hex_part.to_ascii_lowercase()))
}

/// Parse a 32-byte hex private key
pub fn signing_key_from_hex(private_key: &str) -> Result<SigningKey, SignatureError> {
    let bytes = decode_hex(private_key)?;
    SigningKey::from_slice(&bytes).map_err(|_| SignatureError::PrivateKey)
}

/// Fresh random signing key
pub fn random_signing_key() -> SigningKey {
    SigningKey::random(&mut OsRng)
}

/// Sign a personal message; returns `0x`-prefixed 65-byte hex with v in {27, 28}
pub fn sign_personal_message(key: &SigningKey, message: &str) -> Result<String, SignatureError> {
    let hash = personal_message_hash(message);
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(&hash)
        .map_err(|_| SignatureError::Recovery)?;

    let mut bytes = Vec::with_capacity(65);
    bytes.extend_from_slice(&signature.to_bytes());
    bytes.push(recovery_id.to_byte() + 27);
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Recover the address that produced `signature` over `message`
pub fn recover_address(signature: &str, message: &str) -> Result<String, SignatureError> {
    let bytes = decode_hex(signature)?;
    if bytes.len() != 65 {
        return Err(SignatureError::Length(bytes.len()));
    }

    // Wallets emit v as 0/1 or 27/28
    let v = bytes[64];
    let v = if v >= 27 { v - 27 } else { v };
    let recovery_id = RecoveryId::from_byte(v).ok_or(SignatureError::RecoveryId(bytes[64]))?;
    let signature = Signature::from_slice(&bytes[..64]).map_err(|_| SignatureError::Recovery)?;

    let hash = personal_message_hash(message);
    let key = VerifyingKey::recover_from_prehash(&hash, &signature, recovery_id)
        .map_err(|_| SignatureError::Recovery)?;
    Ok(address_of(&key))
}

/// True if `signature` over `message` was produced by `address`
pub fn verify_personal_signature(
    address: &str,
    signature: &str,
    message: &str,
) -> Result<bool, SignatureError> {
    let recovered = recover_address(signature, message)?;
    Ok(recovered.eq_ignore_ascii_case(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_keccak256_known_value() {
        let hash = keccak256(b"");
        assert_eq!(
            hex::encode(hash),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_address_of_known_key() {
        let key = signing_key_from_hex(KEY_ONE).unwrap();
        assert_eq!(
            address_of(key.verifying_key()),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_sign_then_recover() {
        let key = random_signing_key();
        let address = address_of(key.verifying_key());

        let signature = sign_personal_message(&key, "Review app 4 with rating 5").unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 2 + 130);

        let recovered = recover_address(&signature, "Review app 4 with rating 5").unwrap();
        assert_eq!(recovered, address);

        let shouted = format!("0x{}", address[2..].to_ascii_uppercase());
        assert!(verify_personal_signature(&shouted, &signature, "Review app 4 with rating 5").unwrap());
    }

    #[test]
    fn test_wrong_message_recovers_other_address() {
        let key = random_signing_key();
        let address = address_of(key.verifying_key());
        let signature = sign_personal_message(&key, "Boost app 1 with 10 HUB").unwrap();

        let verified = verify_personal_signature(&address, &signature, "Boost app 1 with 99 HUB");
        assert!(!verified.unwrap_or(false));
    }

    #[test]
    fn test_recover_accepts_zero_based_v() {
        let key = random_signing_key();
        let address = address_of(key.verifying_key());
        let signature = sign_personal_message(&key, "hello").unwrap();

        let mut bytes = decode_hex(&signature).unwrap();
        bytes[64] -= 27;
        let raw_v = format!("0x{}", hex::encode(bytes));
        assert_eq!(recover_address(&raw_v, "hello").unwrap(), address);
    }

    #[test]
    fn test_recover_rejects_bad_input() {
        assert!(matches!(
            recover_address("0xzz", "m"),
            Err(SignatureError::Hex(_))
        ));
        assert_eq!(
            recover_address("0x0102", "m"),
            Err(SignatureError::Length(2))
        );

        let mut bytes = vec![1u8; 65];
        bytes[64] = 40;
        assert_eq!(
            recover_address(&hex::encode(bytes), "m"),
            Err(SignatureError::RecoveryId(40))
        );
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"),
            Some("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf".to_string())
        );
        assert_eq!(normalize_address("7e5f4552091a69125d5dfcb7b8c2659029395bdf"), None);
        assert_eq!(normalize_address("0x1234"), None);
        assert_eq!(
            normalize_address("0xg000000000000000000000000000000000000000"),
            None
        );
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
    }
}
