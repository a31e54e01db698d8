//! Request tracing middleware

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;

/// Client address as reported by a fronting proxy
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
}

/// Middleware for logging request information with timing.
///
/// Only the method, path and peer are recorded; cookies and bodies carry
/// session tokens and passwords and are never logged.
pub async fn request_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = client_ip(request.headers());

    let span = tracing::info_span!("request", method = %method, path = %path);
    let start = Instant::now();

    let response = async {
        tracing::debug!(client_ip = ?client_ip, "Request started");
        next.run(request).await
    }
    .instrument(span.clone())
    .await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    span.in_scope(|| log_completion(status, duration_ms, client_ip.as_deref()));

    response
}

fn log_completion(status: StatusCode, duration_ms: u64, client_ip: Option<&str>) {
    let code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(status = code, duration_ms, client_ip, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(status = code, duration_ms, client_ip, "Request rejected");
    } else {
        tracing::info!(status = code, duration_ms, client_ip, "Request completed");
    }
}
