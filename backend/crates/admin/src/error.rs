//! Admin Error Types
//!
//! Admin-specific error variants that render through
//! `kernel::error::AppError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Admin-specific result type alias
pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    /// No `wallet-address` header
    #[error("No wallet address provided")]
    NoWalletAddress,

    /// Address is not `0x` + 40 hex digits
    #[error("Invalid wallet address")]
    InvalidAddress,

    /// Challenge id or signature header absent
    #[error("Admin challenge and signature required")]
    ChallengeRequired,

    /// Unknown, already used, or malformed challenge id
    #[error("Challenge not found or already used")]
    ChallengeNotFound,

    /// Challenge TTL exceeded
    #[error("Challenge expired")]
    ChallengeExpired,

    /// Challenge was issued for another address
    #[error("Challenge not issued for this address")]
    AddressMismatch,

    /// Signature malformed or signed by someone else
    #[error("Invalid admin signature")]
    InvalidSignature,

    /// Too many challenges requested
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::InvalidAddress => StatusCode::BAD_REQUEST,
            AdminError::NoWalletAddress
            | AdminError::ChallengeRequired
            | AdminError::ChallengeNotFound
            | AdminError::ChallengeExpired
            | AdminError::AddressMismatch
            | AdminError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AdminError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::InvalidAddress => ErrorKind::BadRequest,
            AdminError::NoWalletAddress
            | AdminError::ChallengeRequired
            | AdminError::ChallengeNotFound
            | AdminError::ChallengeExpired
            | AdminError::AddressMismatch
            | AdminError::InvalidSignature => ErrorKind::Unauthorized,
            AdminError::RateLimitExceeded => ErrorKind::TooManyRequests,
            AdminError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            AdminError::Internal(msg) => {
                tracing::error!(message = %msg, "Admin gate internal error");
            }
            AdminError::InvalidSignature | AdminError::AddressMismatch => {
                tracing::warn!(error = %self, "Admin signature rejected");
            }
            AdminError::RateLimitExceeded => {
                tracing::warn!("Admin challenge rate limit exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Admin gate error");
            }
        }
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let app_error = AppError::new(kind, message);
        match err {
            AdminError::ChallengeRequired
            | AdminError::ChallengeNotFound
            | AdminError::ChallengeExpired => {
                app_error.with_action("Request a new challenge from /api/admin/challenge")
            }
            _ => app_error,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<platform::crypto::SignatureError> for AdminError {
    fn from(err: platform::crypto::SignatureError) -> Self {
        tracing::debug!(error = %err, "Signature could not be recovered");
        AdminError::InvalidSignature
    }
}
