//! Service-level handlers: banner, health and fallbacks

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub auth: &'static str,
    pub account: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: EndpointIndex,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

/// GET / - Service banner
pub async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "KodBank API Server",
        version: env!("CARGO_PKG_VERSION"),
        status: "Running",
        endpoints: EndpointIndex {
            auth: "/api/auth/register, /api/auth/login, /api/auth/logout, /api/auth/logout-session",
            account: "/api/account/balance",
            health: "/health",
        },
    })
}

/// GET /health - Liveness plus store reachability
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match state.auth_service.store_health().await {
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the store");
            ("unhealthy", "unreachable".to_string())
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

/// Fallback for a known path hit with the wrong verb
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
