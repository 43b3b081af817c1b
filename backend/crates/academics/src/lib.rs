//! Academic Records Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, enrollment and grading rules, repository traits
//! - `application/` - Services and request validation
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, role-gated router
//!
//! ## Features
//! - Student records with soft deactivation
//! - Course catalog with instructor assignment
//! - Enrollments with drop and a configurable re-enrollment policy
//! - Grade assignment with history; the latest grade is the current one
//! - Per-role dashboards
//!
//! Every route sits behind the gates exported by the `auth` crate.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AcademicsConfig, ReEnrollmentPolicy};
pub use error::{AcademicsError, AcademicsResult};
pub use infra::postgres::PgAcademicsRepository;
pub use presentation::router::{academics_router, academics_router_generic};

#[cfg(test)]
mod tests;
