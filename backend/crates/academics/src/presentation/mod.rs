//! Presentation Layer
//!
//! HTTP handlers, DTOs and the role-gated router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{AcademicsAppState, AcademicsRepository};
pub use router::{academics_router, academics_router_generic};
