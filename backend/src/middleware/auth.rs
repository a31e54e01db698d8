//! Authentication middleware
//!
//! Extractor that verifies the session cookie before a protected handler runs.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{
    removal_cookie, session_token, AuthService, AuthenticatedUser, RejectReason, SessionCheck,
};
use crate::error::ApiError;

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct RejectionBody {
    success: bool,
    code: &'static str,
    message: &'static str,
}

/// 401 answer for a rejected session
#[derive(Debug, Clone, Copy)]
pub struct SessionRejection(pub RejectReason);

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let reason = self.0;
        tracing::debug!(code = reason.code(), "Session rejected");

        let body = Json(RejectionBody {
            success: false,
            code: reason.code(),
            message: reason.message(),
        });

        // The client's copy of an expired token is useless, tell it to drop it
        if reason == RejectReason::TokenExpired {
            let jar = CookieJar::new().add(removal_cookie());
            return (StatusCode::UNAUTHORIZED, jar, body).into_response();
        }

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extractor for authenticated users
///
/// This extractor reads the `authToken` cookie, verifies it and checks the
/// session ledger. Handlers taking it never run for anonymous callers.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, {}", user.username)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar);

        let auth_service = Arc::<AuthService>::from_ref(state);

        match auth_service.authenticate(token.as_deref()).await {
            Ok(SessionCheck::Authenticated(user)) => Ok(user),
            Ok(SessionCheck::Rejected(reason)) => Err(SessionRejection(reason).into_response()),
            Err(e) => Err(ApiError::from(e).into_response()),
        }
    }
}
