//! Domain Layer
//!
//! Contains entities, value objects, repository traits, and credential services.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{NewUser, RoleRecord, User, UserCredentials};
pub use repository::{RoleRepository, UserRepository};
