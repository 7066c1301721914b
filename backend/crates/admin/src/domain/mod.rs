//! Domain Layer
//!
//! - Entity: `AdminChallenge`
//! - Value objects: `AdminAddress`, gate header names
//! - Services: challenge message and signature check
//! - Repository trait: challenge storage

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
