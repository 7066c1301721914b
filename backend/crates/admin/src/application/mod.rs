//! Application Layer - Use cases

pub mod config;
pub mod issue_challenge;
pub mod verify_signature;
