//! Authentication routes

use axum::{routing::post, Router};

use crate::handlers::{auth, method_not_allowed};
use crate::state::AppState;

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/auth/register",
            post(auth::register).fallback(method_not_allowed),
        )
        .route(
            "/api/auth/login",
            post(auth::login).fallback(method_not_allowed),
        )
        .route(
            "/api/auth/logout",
            post(auth::logout).fallback(method_not_allowed),
        )
        .route(
            "/api/auth/logout-session",
            post(auth::logout_session).fallback(method_not_allowed),
        )
}
