//! Middleware for the KodBank API
//!
//! This module provides request tracing, security headers and the session
//! authorization gate.

pub mod auth;
mod security;
mod tracing;

pub use auth::SessionRejection;
pub use security::{hsts_header, security_headers};
pub use self::tracing::request_tracing;
