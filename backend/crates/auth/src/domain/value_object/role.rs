//! Role Value Object
//!
//! The four named roles. Role membership is always resolved by name through
//! this enum and the role registry, never by numeric id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field error shown for an unknown role
pub const ROLE_ERROR_MESSAGE: &str =
    "Valid role is required (student, instructor, registrar, admin)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Registrar,
    Instructor,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Registrar, Role::Instructor, Role::Student];

    /// Name stored in `roles.role_name`
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Registrar => "registrar",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }

    /// Case-insensitive parse; surrounding whitespace is ignored
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
