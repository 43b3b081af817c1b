//! Credential values
//!
//! The only types that hold a password hash.

use kernel::id::RoleId;
use platform::password::HashedPassword;

use super::user::User;
use crate::domain::value_object::{Email, FullName};

/// A user together with the stored hash, returned only for sign-in
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: HashedPassword,
}

/// Insert payload for the credential store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: FullName,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role_id: RoleId,
}
