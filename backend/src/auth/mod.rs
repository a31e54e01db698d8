//! Authentication module for KodBank
//!
//! Provides username/password authentication with server-tracked sessions.
//! - bcrypt password hashing
//! - JWT session tokens delivered in the `authToken` cookie
//! - A token ledger that allows sessions to be revoked before they expire

pub mod cookie;
mod jwt;
mod password;
mod service;
mod session;

pub use cookie::{removal_cookie, session_token, CookieConfig, AUTH_COOKIE_NAME};
pub use jwt::{Claims, JwtError, TokenIssuer, TokenStatus};
pub use password::{PasswordError, PasswordHasher, DEFAULT_COST, MAX_PASSWORD_BYTES};
pub use service::{AuthError, AuthService, LoginOutcome};
pub use session::{AuthenticatedUser, RejectReason, SessionCheck, SessionVerifier};
