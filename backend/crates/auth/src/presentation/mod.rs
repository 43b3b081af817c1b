//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, identity extractor and gates.

pub mod dto;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use identity::{OptionalIdentity, RequestIdentity};
pub use middleware::{AllowedRoles, authorize, optional_auth, require_auth};
pub use router::{auth_router, auth_router_generic};
