//! Request identity
//!
//! The authentication gate stores a [`RequestIdentity`] in the request
//! extensions; handlers take it as an extractor argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kernel::id::UserId;

use crate::application::token::Claims;
use crate::domain::value_object::{Email, Role};
use crate::error::AuthError;

/// Verified caller identity
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub user_id: UserId,
    pub role: Role,
    pub email: Option<Email>,
    /// The raw bearer token
    pub token: String,
}

impl RequestIdentity {
    /// Build from verified access-token claims
    ///
    /// `None` if the role claim is missing or names no known role.
    pub fn from_claims(claims: Claims, token: String) -> Option<Self> {
        let role = claims.role.as_deref().and_then(Role::parse)?;
        Some(Self {
            user_id: claims.user_id(),
            role,
            email: claims.email.as_deref().and_then(|e| Email::new(e).ok()),
            token,
        })
    }
}

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .ok_or(AuthError::NoUserContext)
    }
}

/// Identity for routes behind `optional_auth`; never rejects
#[derive(Debug, Clone, Default)]
pub struct OptionalIdentity(pub Option<RequestIdentity>);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<RequestIdentity>().cloned()))
    }
}
