//! Shared Kernel - vocabulary shared by every hub crate
//!
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Typed numeric identifiers for backend-owned records
//!
//! Only things with the same meaning in the gateway, the admin gate and the
//! client library belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
    pub mod wire;
}
pub mod id;
