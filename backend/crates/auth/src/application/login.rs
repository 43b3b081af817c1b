//! Login Use Case
//!
//! Verifies credentials and issues an access/refresh token pair.

use std::sync::Arc;

use kernel::error::app_error::FieldErrors;

use crate::application::token::TokenService;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::verify_password;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
#[derive(Debug, Default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let mut errors = FieldErrors::new();
        let email = Email::new(input.email.unwrap_or_default())
            .map_err(|msg| errors.insert("email".into(), msg.into()))
            .ok();
        let password = input.password.unwrap_or_default();
        if password.trim().is_empty() {
            errors.insert("password".into(), "Password is required".into());
        }
        let Some(email) = email.filter(|_| errors.is_empty()) else {
            return Err(AuthError::Validation(errors));
        };

        let credentials = self
            .user_repo
            .find_credentials_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&password, &credentials.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let user = credentials.user;
        let access_token = self
            .tokens
            .generate_access_token(user.id, user.role, &user.email)?;
        let refresh_token = self.tokens.generate_refresh_token(user.id)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

        Ok(LoginOutput {
            user,
            access_token,
            refresh_token,
            expires_in: self.tokens.access_ttl_secs(),
        })
    }
}
