//! Route definitions for the KodBank API

mod account;
mod auth;

use axum::{middleware, routing::get, Router};

use crate::handlers::{health_check, method_not_allowed, not_found, root};
use crate::state::AppState;

pub use account::account_routes;
pub use auth::auth_routes;

/// Assemble the full application router.
///
/// Transport layers (CORS, request tracing, HSTS) are added by the binary so
/// tests can drive this router directly.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root).fallback(method_not_allowed))
        .route("/health", get(health_check).fallback(method_not_allowed))
        .merge(auth_routes())
        .merge(account_routes())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(crate::middleware::security_headers))
}
