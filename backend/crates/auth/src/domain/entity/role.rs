//! Role registry records

use chrono::{DateTime, Utc};
use kernel::id::RoleId;
use serde::Serialize;

/// Row of the `roles` table
#[derive(Debug, Clone, Serialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub role_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `permissions` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub id: i64,
    pub permission_name: String,
    pub description: Option<String>,
}
