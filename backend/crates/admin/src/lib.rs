//! Admin Signature Gate
//!
//! Clean Architecture structure:
//! - `domain/` - Challenge entity, message format, repository trait
//! - `application/` - Issue and verify use cases
//! - `infra/` - In-memory challenge store
//! - `presentation/` - Challenge endpoint and gate middleware
//!
//! ## Security Model
//! - A `wallet-address` header alone never grants admin access
//! - Challenges are single use, bound to one address and short lived
//! - Challenge consumption is atomic (no replay)
//! - The signer is recovered from an EIP-191 signature and must equal the
//!   claimed address
//! - Challenge issuance is rate limited per client IP

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::AdminConfig;
pub use error::{AdminError, AdminResult};
pub use infra::memory::InMemoryChallengeRepository;
pub use presentation::handlers::AdminAppState;
pub use presentation::middleware::require_admin_signature;
pub use presentation::router::{admin_router, protect};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
