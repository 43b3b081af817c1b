//! Service-level routes: health, banner and the 404 fallback

use axum::{Router, http::Uri, routing::get};
use chrono::Utc;
use kernel::error::app_error::AppError;
use kernel::response::ApiResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct Banner {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub auth: &'static str,
    pub api: &'static str,
}

async fn health() -> ApiResponse<Health> {
    ApiResponse::ok(
        "HEALTH_OK",
        "Server is running",
        Health {
            status: "ok",
            timestamp: Utc::now().to_rfc3339(),
        },
    )
}

async fn banner() -> ApiResponse<Banner> {
    ApiResponse::ok(
        "SERVICE_INFO",
        "Academic Management System API",
        Banner {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            endpoints: Endpoints {
                health: "/health",
                auth: "/api/auth",
                api: "/api",
            },
        },
    )
}

async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "No route");
    AppError::not_found("Endpoint not found").with_code("NOT_FOUND")
}

/// Routes that live outside `/api`, plus the fallback for everything unmatched
pub fn service_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(banner))
        .fallback(not_found)
}
