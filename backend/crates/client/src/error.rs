//! Client Error Types

use crate::config::Module;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Server answered with a non-2xx status
    #[error("{message} (status {status})")]
    Http { status: u16, message: String },

    /// Request never got an answer
    #[error("Request failed: {0}")]
    Transport(String),

    /// Module is off in the runtime config; nothing was sent
    #[error("The {0} module is not enabled")]
    ModuleDisabled(Module),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Caller input rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl ClientError {
    /// Status code for server-side failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Wallet session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("No Ethereum wallet found. Please install MetaMask or another wallet.")]
    NoWalletFound,

    #[error("User rejected the request")]
    UserRejected,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Wallet provider error: {0}")]
    Provider(String),
}
