//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the gateway and the client library:
//! - Wallet cryptography (Keccak-256, EIP-191 personal messages, secp256k1
//!   signing and signer recovery)
//! - Client identification from request headers
//! - Rate limiting infrastructure

pub mod client;
pub mod crypto;
pub mod rate_limit;
