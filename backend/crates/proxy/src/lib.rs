//! Request Proxy Module
//!
//! Forwards hub API calls from the browser to the backend service.
//!
//! Clean Architecture structure:
//! - `domain/` - Forwarding vocabulary, header allow-list, backend trait
//! - `application/` - Forwarding use case and configuration
//! - `infra/` - reqwest-backed backend client
//! - `presentation/` - HTTP handlers and router
//!
//! ## Forwarding contract
//! - Method, query (minus internal routing keys) and body bytes pass through
//!   unchanged; only allow-listed headers are forwarded. Uploads are streamed.
//! - Backend success is relayed verbatim (status, content type, body)
//! - Backend failure relays the backend status and `message`; an unreachable
//!   backend becomes a 500 with a generic message
//! - Malformed path parameters are rejected with 400 before any backend call

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use infra::http::HttpBackend;
pub use presentation::handlers::ProxyAppState;
pub use presentation::router::{admin_routes, proxy_router};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
