//! Register Use Case
//!
//! Creates a new account in the credential store.

use std::sync::Arc;

use kernel::error::app_error::FieldErrors;
use kernel::id::UserId;
use platform::password::{ClearTextPassword, PASSWORD_POLICY_MESSAGE, PasswordPolicyError};

use crate::domain::entity::NewUser;
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::service::hash_password;
use crate::domain::value_object::{Email, FullName, Role, role::ROLE_ERROR_MESSAGE};
use crate::error::{AuthError, AuthResult};

/// Register input; every field is optional so that missing ones show up in
/// the field error map instead of failing deserialization.
#[derive(Debug, Default)]
pub struct RegisterInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
    pub email: Email,
    pub role: String,
}

struct ValidRegistration {
    full_name: FullName,
    email: Email,
    password: ClearTextPassword,
    role: Role,
}

/// Register use case
pub struct RegisterUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    user_repo: Arc<U>,
    role_repo: Arc<R>,
}

impl<U, R> RegisterUseCase<U, R>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let valid = validate(input)?;

        // Soft-deleted accounts keep their address reserved.
        if self.user_repo.email_exists(&valid.email).await? {
            return Err(AuthError::EmailExists);
        }

        let role = self
            .role_repo
            .find_by_name(valid.role.as_str())
            .await?
            .ok_or(AuthError::InvalidRole)?;

        let password_hash = hash_password(valid.password).await?;

        let user_id = self
            .user_repo
            .create(&NewUser {
                full_name: valid.full_name,
                email: valid.email.clone(),
                password_hash,
                role_id: role.id,
            })
            .await?;

        tracing::info!(
            user_id = %user_id,
            email = %valid.email,
            role = %role.role_name,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id,
            email: valid.email,
            role: role.role_name,
        })
    }
}

/// Collect every field error at once
fn validate(input: RegisterInput) -> AuthResult<ValidRegistration> {
    let mut errors = FieldErrors::new();

    let full_name = FullName::new(input.full_name.unwrap_or_default())
        .map_err(|msg| errors.insert("fullName".into(), msg.into()))
        .ok();

    let email = Email::new(input.email.unwrap_or_default())
        .map_err(|msg| errors.insert("email".into(), msg.into()))
        .ok();

    let password = ClearTextPassword::new(input.password.unwrap_or_default())
        .map_err(|e| errors.insert("password".into(), password_message(&e)))
        .ok();

    let role = input
        .role
        .as_deref()
        .and_then(Role::parse)
        .or_else(|| {
            errors.insert("role".into(), ROLE_ERROR_MESSAGE.into());
            None
        });

    match (full_name, email, password, role) {
        (Some(full_name), Some(email), Some(password), Some(role)) if errors.is_empty() => {
            Ok(ValidRegistration {
                full_name,
                email,
                password,
                role,
            })
        }
        _ => Err(AuthError::Validation(errors)),
    }
}

fn password_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::Empty => err.to_string(),
        PasswordPolicyError::TooShort { .. } | PasswordPolicyError::Weak => {
            PASSWORD_POLICY_MESSAGE.to_string()
        }
        PasswordPolicyError::TooLong { .. } | PasswordPolicyError::InvalidCharacter => {
            err.to_string()
        }
    }
}
