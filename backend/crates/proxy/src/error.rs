//! Proxy Error Types
//!
//! Proxy-specific error variants. Errors produced locally render through
//! `kernel::error::AppError`; errors relayed from the backend keep the
//! backend's status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Message used whenever the backend cannot be reached or says nothing useful
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Proxy-specific result type alias
pub type ProxyResult<T> = Result<T, ProxyError>;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Path id is missing or not a numeric record id
    #[error("Invalid app ID")]
    InvalidAppId,

    /// Path escapes the backend root or is empty
    #[error("Invalid path")]
    InvalidPath,

    /// Path is not served by the proxy (admin paths bypassing the gate)
    #[error("Not found")]
    UnknownRoute,

    /// Required body field or header is absent
    #[error("Missing required parameters")]
    MissingParameters,

    /// Admin call without a wallet address
    #[error("No wallet address provided")]
    NoWalletAddress,

    /// Route exists but not for this method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Inbound body over the configured limit
    #[error("Request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// Inbound body could not be read (client went away mid-upload)
    #[error("Invalid request body")]
    BodyRead(String),

    /// Backend answered with a non-2xx status
    #[error("Backend responded with {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Backend could not be reached (connect, timeout, broken response)
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Route-level failure reported with a fixed message and status 500
    #[error("{0}")]
    Collapsed(&'static str),

    /// Target URL could not be built
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidAppId
            | ProxyError::InvalidPath
            | ProxyError::MissingParameters
            | ProxyError::BodyRead(_) => StatusCode::BAD_REQUEST,
            ProxyError::NoWalletAddress => StatusCode::UNAUTHORIZED,
            ProxyError::UnknownRoute => StatusCode::NOT_FOUND,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::Unreachable(_) | ProxyError::Collapsed(_) | ProxyError::InvalidUrl(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Kind for locally produced errors. Upstream statuses outside the
    /// kernel's table are reported as internal errors here but keep their
    /// own status on the wire.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::InvalidAppId
            | ProxyError::InvalidPath
            | ProxyError::MissingParameters
            | ProxyError::BodyRead(_) => ErrorKind::BadRequest,
            ProxyError::NoWalletAddress => ErrorKind::Unauthorized,
            ProxyError::UnknownRoute => ErrorKind::NotFound,
            ProxyError::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            ProxyError::BodyTooLarge(_) => ErrorKind::PayloadTooLarge,
            ProxyError::Upstream { .. }
            | ProxyError::Unreachable(_)
            | ProxyError::Collapsed(_)
            | ProxyError::InvalidUrl(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show the caller
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::Upstream { message, .. } => message.clone(),
            ProxyError::Unreachable(_) | ProxyError::InvalidUrl(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    fn log(&self) {
        match self {
            ProxyError::Unreachable(e) => {
                tracing::error!(error = %e, "Backend unreachable");
            }
            ProxyError::InvalidUrl(e) => {
                tracing::error!(error = %e, "Invalid backend URL");
            }
            ProxyError::Upstream { status, message } => {
                tracing::warn!(status = %status, message = %message, "Backend returned an error");
            }
            ProxyError::BodyRead(e) => {
                tracing::debug!(error = %e, "Inbound body read failed");
            }
            ProxyError::Collapsed(message) => {
                tracing::warn!(message = %message, "Proxied request failed");
            }
            _ => {
                tracing::debug!(error = %self, "Proxy request rejected");
            }
        }
    }
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.log();
        match &self {
            ProxyError::Upstream { status, message } => {
                (*status, Json(serde_json::json!({ "message": message }))).into_response()
            }
            _ => self.to_app_error().into_response(),
        }
    }
}
