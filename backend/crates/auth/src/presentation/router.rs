//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::value_object::Role;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AllowedRoles, authorize, require_auth};

const ADMIN_ONLY: AllowedRoles = AllowedRoles::new(&[Role::Admin]);

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, tokens: Arc<TokenService>) -> Router {
    auth_router_generic(repo, tokens)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, tokens: Arc<TokenService>) -> Router
where
    R: UserRepository + RoleRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens: tokens.clone(),
    };

    let public = Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>));

    let authenticated = Router::new()
        .route("/profile", get(handlers::profile::<R>))
        .route_layer(from_fn_with_state(tokens.clone(), require_auth));

    let admin = Router::new()
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/{id}", delete(handlers::delete_user::<R>))
        .route("/users/{id}/role", put(handlers::update_user_role::<R>))
        .route_layer(from_fn_with_state(ADMIN_ONLY, authorize))
        .route_layer(from_fn_with_state(tokens, require_auth));

    public.merge(authenticated).merge(admin).with_state(state)
}
