//! User Entity
//!
//! Public view of a credential-store record. It never carries the password
//! hash; see [`UserCredentials`](super::credentials::UserCredentials).

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{Email, FullName, Role};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub full_name: FullName,
    pub email: Email,
    /// Resolved from `roles.role_name`
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

