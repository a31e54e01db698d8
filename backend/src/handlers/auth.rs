//! Authentication HTTP handlers
//!
//! Endpoints for username/password registration, login and logout.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use super::AuthenticatedUser;
use crate::auth::{removal_cookie, session_token};
use crate::error::ApiError;
use crate::models::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
};
use crate::state::AppState;

/// Unwrap a JSON body, answering malformed input with a validation error
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            Err(ApiError::ValidationError("Invalid request body".to_string()))
        }
    }
}

/// POST /api/auth/register - Create a customer account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let req = json_body(payload)?;
    let user_id = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

/// POST /api/auth/login - Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let req = json_body(payload)?;
    let outcome = state.auth_service.login(req).await?;

    let jar = jar.add(state.cookie_config.session_cookie(outcome.token));

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            username: outcome.username,
            role: outcome.role,
        }),
    ))
}

/// POST /api/auth/logout - Revoke every session of the caller
///
/// Always succeeds; the cookie is cleared even when there was nothing to revoke.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let token = session_token(&jar);
    state.auth_service.logout(token.as_deref()).await;

    (
        jar.add(removal_cookie()),
        Json(MessageResponse::ok("Logout successful")),
    )
}

/// POST /api/auth/logout-session - Revoke only the current session
pub async fn logout_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let token = session_token(&jar)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let revoked = state.auth_service.logout_session(&token).await?;
    tracing::debug!(username = %user.username, revoked, "Session logout");

    Ok((
        jar.add(removal_cookie()),
        Json(MessageResponse::ok("Session logged out")),
    ))
}
