//! Refresh Token Use Case
//!
//! Exchanges a refresh token for a new access token. The user is re-read so
//! that role changes and soft deletes take effect.

use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshOutput {
    pub access_token: String,
    pub expires_in: i64,
}

pub struct RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<RefreshOutput> {
        let token = refresh_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MissingRefreshToken)?;

        let claims = self
            .tokens
            .verify_refresh_token(token)
            .ok_or(AuthError::InvalidRefreshToken)?;

        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access_token = self
            .tokens
            .generate_access_token(user.id, user.role, &user.email)?;

        tracing::debug!(user_id = %user.id, "Access token refreshed");

        Ok(RefreshOutput {
            access_token,
            expires_in: self.tokens.access_ttl_secs(),
        })
    }
}
