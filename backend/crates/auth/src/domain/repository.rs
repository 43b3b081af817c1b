//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{RoleId, UserId};

use crate::domain::entity::{NewUser, Permission, RoleRecord, User, UserCredentials};
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// Credential store
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user; fails with `EmailExists` on a duplicate address
    async fn create(&self, user: &NewUser) -> AuthResult<UserId>;

    /// Active user by exact email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Active user plus stored hash (sign-in only)
    async fn find_credentials_by_email(&self, email: &Email)
    -> AuthResult<Option<UserCredentials>>;

    /// Active user by id
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    /// Whether any user (active or not) holds this email
    async fn email_exists(&self, email: &Email) -> AuthResult<bool>;

    /// Soft delete; returns whether a row changed
    async fn delete(&self, id: UserId) -> AuthResult<bool>;

    /// Returns whether a row changed
    async fn update_role(&self, id: UserId, role_id: RoleId) -> AuthResult<bool>;

    /// Active users, newest first
    async fn get_all(&self, limit: i64, offset: i64) -> AuthResult<Vec<User>>;
}

/// Role registry
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    /// Exact match on `role_name`
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<RoleRecord>>;

    async fn find_by_id(&self, id: RoleId) -> AuthResult<Option<RoleRecord>>;

    /// All roles ordered by id
    async fn get_all(&self) -> AuthResult<Vec<RoleRecord>>;

    /// Direct user grant or grant through the user's role
    async fn has_permission(&self, user_id: UserId, permission: &str) -> AuthResult<bool>;

    async fn create(&self, name: &str, description: Option<&str>) -> AuthResult<RoleId>;

    async fn get_permissions_by_role(&self, role_id: RoleId) -> AuthResult<Vec<Permission>>;
}
