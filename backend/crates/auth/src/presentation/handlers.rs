//! HTTP Handlers

use axum::extract::{Query, State};
use std::sync::Arc;

use kernel::extract::{ApiJson, ApiPath};
use kernel::id::UserId;
use kernel::response::ApiResponse;

use crate::application::token::TokenService;
use crate::application::{
    DeleteUserUseCase, ListUsersUseCase, LoginInput, LoginUseCase, ProfileUseCase,
    RefreshTokenUseCase, RegisterInput, RegisterUseCase, UpdateUserRoleUseCase,
};
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    DeletedUserResponse, ListUsersQuery, LoginRequest, LoginResponse, ProfileResponse,
    RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse, RoleUpdatedResponse,
    UpdateRoleRequest, UserListItem, UserSummary,
};
use crate::presentation::identity::RequestIdentity;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
}

// Manual impl: `R` itself is shared through `Arc`.
impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> AuthResult<ApiResponse<RegisterResponse>>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.repo.clone());

    let output = use_case
        .execute(RegisterInput {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok(ApiResponse::created(
        "REGISTRATION_SUCCESS",
        "User registered successfully",
        RegisterResponse {
            user_id: output.user_id.get(),
            email: output.email.into_db(),
            role: output.role,
        },
    ))
}

// ============================================================================
// Login / Refresh
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AuthResult<ApiResponse<LoginResponse>>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::ok(
        "LOGIN_SUCCESS",
        "Login successful",
        LoginResponse {
            user: UserSummary::from(&output.user),
            access_token: output.access_token,
            refresh_token: output.refresh_token,
            expires_in: output.expires_in,
        },
    ))
}

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> AuthResult<ApiResponse<RefreshResponse>>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshTokenUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case.execute(req.refresh_token.as_deref()).await?;

    Ok(ApiResponse::ok(
        "TOKEN_REFRESH_SUCCESS",
        "Token refreshed successfully",
        RefreshResponse {
            access_token: output.access_token,
            expires_in: output.expires_in,
        },
    ))
}

// ============================================================================
// Profile (requires authentication)
// ============================================================================

/// GET /api/auth/profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: RequestIdentity,
) -> AuthResult<ApiResponse<ProfileResponse>>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.repo.clone())
        .execute(identity.user_id)
        .await?;

    Ok(ApiResponse::ok(
        "PROFILE_SUCCESS",
        "Profile retrieved successfully",
        ProfileResponse::from(user),
    ))
}

// ============================================================================
// User management (admin)
// ============================================================================

/// GET /api/auth/users?limit&offset
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    Query(query): Query<ListUsersQuery>,
) -> AuthResult<ApiResponse<Vec<UserListItem>>>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.repo.clone())
        .execute(query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        "USERS_SUCCESS",
        "Users retrieved successfully",
        users.into_iter().map(UserListItem::from).collect(),
    ))
}

/// DELETE /api/auth/users/{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    identity: RequestIdentity,
    ApiPath(id): ApiPath<i64>,
) -> AuthResult<ApiResponse<DeletedUserResponse>>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let user = DeleteUserUseCase::new(state.repo.clone())
        .execute(identity.user_id, UserId::new(id))
        .await?;

    Ok(ApiResponse::ok(
        "USER_DELETED",
        "User deleted successfully",
        DeletedUserResponse {
            id: user.id.get(),
            email: user.email.into_db(),
        },
    ))
}

/// PUT /api/auth/users/{id}/role
pub async fn update_user_role<R>(
    State(state): State<AuthAppState<R>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateRoleRequest>,
) -> AuthResult<ApiResponse<RoleUpdatedResponse>>
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let (user, new_role) = UpdateUserRoleUseCase::new(state.repo.clone(), state.repo.clone())
        .execute(UserId::new(id), req.role.as_deref())
        .await?;

    Ok(ApiResponse::ok(
        "ROLE_UPDATED",
        "User role updated successfully",
        RoleUpdatedResponse {
            id: user.id.get(),
            email: user.email.into_db(),
            new_role,
        },
    ))
}
