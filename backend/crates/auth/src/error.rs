//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldErrors},
    kind::ErrorKind,
};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request body failed field validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Email already registered")]
    EmailExists,

    #[error("Invalid role")]
    InvalidRole,

    #[error("Role is required")]
    MissingRole,

    /// Unknown email or wrong password (indistinguishable on purpose)
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Refresh token is required")]
    MissingRefreshToken,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Cannot delete your own account")]
    CannotDeleteSelf,

    #[error("Failed to delete user")]
    DeleteFailed,

    #[error("Failed to update user role")]
    UpdateFailed,

    // ------------------------------------------------------------------------
    // Gate rejections
    // ------------------------------------------------------------------------
    #[error("Unauthorized - No token provided")]
    NoToken,

    #[error("Unauthorized - Invalid or expired token")]
    InvalidToken,

    #[error("Unauthorized - No user context")]
    NoUserContext,

    /// Carries the accepted roles, comma separated
    #[error("Forbidden - Access requires one of the following roles: {0}")]
    InsufficientPermission(String),

    // ------------------------------------------------------------------------
    // Infrastructure
    // ------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password error: {0}")]
    Password(#[from] PasswordHashError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::InvalidRole
            | AuthError::MissingRole
            | AuthError::MissingRefreshToken
            | AuthError::CannotDeleteSelf
            | AuthError::DeleteFailed
            | AuthError::UpdateFailed => ErrorKind::BadRequest,
            AuthError::EmailExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::NoToken
            | AuthError::InvalidToken
            | AuthError::NoUserContext => ErrorKind::Unauthorized,
            AuthError::InsufficientPermission(_) => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_)
            | AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Machine-readable code for the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::EmailExists => "EMAIL_EXISTS",
            AuthError::InvalidRole => "INVALID_ROLE",
            AuthError::MissingRole => "MISSING_ROLE",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingRefreshToken => "MISSING_REFRESH_TOKEN",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::CannotDeleteSelf => "CANNOT_DELETE_SELF",
            AuthError::DeleteFailed => "DELETE_FAILED",
            AuthError::UpdateFailed => "UPDATE_FAILED",
            AuthError::NoToken => "NO_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::NoUserContext => "NO_USER_CONTEXT",
            AuthError::InsufficientPermission(_) => "INSUFFICIENT_PERMISSION",
            AuthError::Database(_)
            | AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    ///
    /// Database errors go through the kernel's sqlx mapping so that pool
    /// exhaustion surfaces as 503.
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Validation(errors) => AppError::validation(errors),
            AuthError::Database(e) => AppError::from(e),
            other => {
                let kind = other.kind();
                let code = other.code();
                let message = other.to_string();
                AppError::new(kind, message).with_code(code).with_source(other)
            }
        }
    }

    /// Log security-relevant rejections
    ///
    /// Server errors are logged by `AppError` when rendered.
    fn log(&self) {
        match self {
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidRefreshToken => {
                tracing::warn!("Rejected refresh token");
            }
            AuthError::InsufficientPermission(roles) => {
                tracing::warn!(required = %roles, "Insufficient role for route");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
