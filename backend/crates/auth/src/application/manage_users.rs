//! User Management Use Cases (admin)
//!
//! Listing, soft deletion and role changes.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::User;
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::value_object::Role;
use crate::error::{AuthError, AuthResult};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

// ============================================================================
// List
// ============================================================================

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, limit: Option<i64>, offset: Option<i64>) -> AuthResult<Vec<User>> {
        let (limit, offset) = page(limit, offset);
        self.user_repo.get_all(limit, offset).await
    }
}

/// Clamp paging parameters
pub fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        offset.unwrap_or(0).max(0),
    )
}

// ============================================================================
// Delete
// ============================================================================

pub struct DeleteUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> DeleteUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Soft-delete `target` on behalf of `actor`
    pub async fn execute(&self, actor: UserId, target: UserId) -> AuthResult<User> {
        if actor == target {
            return Err(AuthError::CannotDeleteSelf);
        }

        let user = self
            .user_repo
            .find_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.user_repo.delete(target).await? {
            return Err(AuthError::DeleteFailed);
        }

        tracing::info!(user_id = %target, deleted_by = %actor, "User deactivated");

        Ok(user)
    }
}

// ============================================================================
// Role change
// ============================================================================

pub struct UpdateUserRoleUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    user_repo: Arc<U>,
    role_repo: Arc<R>,
}

impl<U, R> UpdateUserRoleUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub fn new(user_repo: Arc<U>, role_repo: Arc<R>) -> Self {
        Self {
            user_repo,
            role_repo,
        }
    }

    /// Returns the user as it was before the change and the new role name
    pub async fn execute(&self, target: UserId, role: Option<&str>) -> AuthResult<(User, String)> {
        let role = role
            .filter(|r| !r.trim().is_empty())
            .ok_or(AuthError::MissingRole)?;

        let user = self
            .user_repo
            .find_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let role = Role::parse(role).ok_or(AuthError::InvalidRole)?;
        let record = self
            .role_repo
            .find_by_name(role.as_str())
            .await?
            .ok_or(AuthError::InvalidRole)?;

        if !self.user_repo.update_role(target, record.id).await? {
            return Err(AuthError::UpdateFailed);
        }

        tracing::info!(
            user_id = %target,
            from = %user.role,
            to = %record.role_name,
            "User role changed"
        );

        Ok((user, record.role_name))
    }
}
