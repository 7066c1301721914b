//! Hub Client Library
//!
//! Typed access to the hub for front-end code:
//! - `config` - runtime configuration with a static fallback, module flags, branding
//! - `api` - one function per backend endpoint, gated by module flags
//! - `wallet` - wallet session over an injected provider
//! - `listing` - URL-synchronised listing filters and pagination
//! - `actions` - signed review, boost, engagement and admin calls

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod wallet;

pub use api::{ApiBase, HubClient};
pub use config::{Branding, ConfigProvider, Module, RuntimeConfig};
pub use error::{ClientError, ClientResult, WalletError};
pub use listing::{ListingPage, ListingQuery};
pub use wallet::{WalletSession, WalletState};
