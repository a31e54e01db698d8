//! Account routes

use axum::{routing::get, Router};

use crate::handlers::{account, method_not_allowed};
use crate::state::AppState;

/// Create account routes; every route here requires a session
pub fn account_routes() -> Router<AppState> {
    Router::new().route(
        "/api/account/balance",
        get(account::get_balance).fallback(method_not_allowed),
    )
}
