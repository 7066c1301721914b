//! Presentation Layer
//!
//! HTTP handlers and DTOs for the proxied API.

pub mod dto;
pub mod handlers;
pub mod router;
