//! Auth Middleware
//!
//! - [`require_auth`]: bearer token → [`RequestIdentity`], or 401
//! - [`optional_auth`]: same, but never rejects
//! - [`authorize`]: role-set check, layered inside `require_auth`
//!
//! ```ignore
//! Router::new()
//!     .route("/users", get(list_users))
//!     .route_layer(from_fn_with_state(AllowedRoles::new(&[Role::Admin]), authorize))
//!     .route_layer(from_fn_with_state(tokens, require_auth))
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::application::token::TokenService;
use crate::domain::value_object::Role;
use crate::error::{AuthError, AuthResult};
use crate::presentation::identity::RequestIdentity;

/// Roles accepted by a route group, fixed at registration
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(&'static [Role]);

impl AllowedRoles {
    pub const fn new(roles: &'static [Role]) -> Self {
        Self(roles)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Comma-separated role names, for the 403 message
    pub fn describe(&self) -> String {
        self.0
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Middleware that requires a valid access token
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = authenticate(&tokens, req.headers())?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Middleware that attaches an identity when a valid token is present
pub async fn optional_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Ok(identity) = authenticate(&tokens, req.headers()) {
        req.extensions_mut().insert(identity);
    }
    next.run(req).await
}

/// Middleware that checks the caller's role against `allowed`
pub async fn authorize(
    State(allowed): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    check_role(req.extensions().get::<RequestIdentity>(), &allowed)?;
    Ok(next.run(req).await)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Verify the bearer token and build the caller identity
pub fn authenticate(tokens: &TokenService, headers: &HeaderMap) -> AuthResult<RequestIdentity> {
    let token = bearer_token(headers).ok_or(AuthError::NoToken)?;
    let claims = tokens
        .verify_access_token(&token)
        .ok_or(AuthError::InvalidToken)?;
    RequestIdentity::from_claims(claims, token).ok_or(AuthError::InvalidToken)
}

/// Pure role-set membership
pub fn check_role(identity: Option<&RequestIdentity>, allowed: &AllowedRoles) -> AuthResult<()> {
    let identity = identity.ok_or(AuthError::NoUserContext)?;
    if allowed.contains(identity.role) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermission(allowed.describe()))
    }
}
