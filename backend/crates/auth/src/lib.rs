//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the token service
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, gates
//!
//! ## Features
//! - Registration and sign-in with email + password
//! - Stateless access/refresh token pair (HS256)
//! - Role-based access (admin, registrar, instructor, student)
//! - Admin user management (list, soft delete, role change)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Access and refresh tokens use separate secrets and carry a type claim
//! - Unknown email and wrong password produce the same response

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::{Claims, TokenService};
pub use domain::value_object::Role;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::identity::{OptionalIdentity, RequestIdentity};
pub use presentation::middleware::{AllowedRoles, authorize, optional_auth, require_auth};
pub use presentation::router::{auth_router, auth_router_generic};
