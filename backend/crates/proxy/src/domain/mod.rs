//! Domain Layer
//!
//! - Forwarded request/response entities
//! - Value objects: backend path, header allow-list, query filtering
//! - Domain services: upstream error message extraction
//! - Backend trait (implemented in the infra layer)

pub mod backend;
pub mod entities;
pub mod services;
pub mod value_objects;
