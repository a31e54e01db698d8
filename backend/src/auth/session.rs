//! Session verification
//!
//! A presented token is trusted only when its signature verifies, it has not
//! expired, and the ledger still holds a row for it. The cheap local checks
//! run first; the ledger round-trip is last.

use std::sync::Arc;

use crate::models::UserRole;
use crate::store::{StoreError, TokenLedger};

use super::jwt::{TokenIssuer, TokenStatus};

/// Identity attached to a request after its session was verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: UserRole,
}

/// Why a session was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoToken,
    InvalidToken,
    TokenExpired,
    RevokedOrUnknown,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::NoToken => "NO_TOKEN",
            RejectReason::InvalidToken => "INVALID_TOKEN",
            RejectReason::TokenExpired => "TOKEN_EXPIRED",
            RejectReason::RevokedOrUnknown => "REVOKED_OR_UNKNOWN",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::NoToken => "No token provided",
            RejectReason::InvalidToken => "Invalid token",
            RejectReason::TokenExpired => "Token expired",
            RejectReason::RevokedOrUnknown => "Invalid or expired token",
        }
    }
}

/// Terminal outcome of a verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Authenticated(AuthenticatedUser),
    Rejected(RejectReason),
}

/// Checks presented tokens against the issuer key and the ledger
#[derive(Clone)]
pub struct SessionVerifier {
    issuer: Arc<TokenIssuer>,
    ledger: Arc<dyn TokenLedger>,
}

impl SessionVerifier {
    pub fn new(issuer: Arc<TokenIssuer>, ledger: Arc<dyn TokenLedger>) -> Self {
        Self { issuer, ledger }
    }

    /// Verify a raw token.
    ///
    /// A ledger failure is returned as `Err`; it must never be read as an
    /// authenticated session.
    pub async fn verify(&self, token: Option<&str>) -> Result<SessionCheck, StoreError> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(SessionCheck::Rejected(RejectReason::NoToken)),
        };

        let claims = match self.issuer.inspect(token) {
            TokenStatus::Valid(claims) => claims,
            TokenStatus::Expired => return Ok(SessionCheck::Rejected(RejectReason::TokenExpired)),
            TokenStatus::Invalid => return Ok(SessionCheck::Rejected(RejectReason::InvalidToken)),
        };

        let Some(role) = UserRole::parse(&claims.role) else {
            tracing::warn!(username = %claims.sub, role = %claims.role, "Signed token carries an unknown role");
            return Ok(SessionCheck::Rejected(RejectReason::InvalidToken));
        };

        match self.ledger.find_by_token(token).await? {
            Some(row) if row.owner == claims.sub => {
                Ok(SessionCheck::Authenticated(AuthenticatedUser {
                    username: claims.sub,
                    role,
                }))
            }
            Some(row) => {
                tracing::warn!(
                    subject = %claims.sub,
                    owner = %row.owner,
                    "Ledger row owner does not match token subject"
                );
                Ok(SessionCheck::Rejected(RejectReason::RevokedOrUnknown))
            }
            None => Ok(SessionCheck::Rejected(RejectReason::RevokedOrUnknown)),
        }
    }
}
