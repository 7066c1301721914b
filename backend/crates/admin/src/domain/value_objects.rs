//! Domain Value Objects

use axum::http::HeaderName;
use std::fmt;

use crate::error::{AdminError, AdminResult};

/// Claimed admin identity, forwarded to the backend once verified
pub const WALLET_ADDRESS: HeaderName = HeaderName::from_static("wallet-address");
/// Challenge id from `GET /admin/challenge`
pub const X_ADMIN_CHALLENGE: HeaderName = HeaderName::from_static("x-admin-challenge");
/// Signature over the challenge message
pub const X_ADMIN_SIGNATURE: HeaderName = HeaderName::from_static("x-admin-signature");

/// Lowercased `0x` wallet address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminAddress(String);

impl AdminAddress {
    pub fn parse(raw: &str) -> AdminResult<Self> {
        platform::crypto::normalize_address(raw.trim())
            .map(Self)
            .ok_or(AdminError::InvalidAddress)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdminAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
