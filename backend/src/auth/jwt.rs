//! JWT token generation and validation
//!
//! Session tokens are HS256 JWTs carrying the username, role and a unique
//! token id so two logins in the same second still yield distinct tokens. Decoding
//! never fails with an error: callers get a [`TokenStatus`] to match on.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UserRole;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// JWT claims for session tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// User role
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    pub jti: String,
}

/// Outcome of checking a token's signature and expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid(Claims),
    Expired,
    Invalid,
}

/// Signs and checks session tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer
    ///
    /// # Arguments
    /// * `secret` - JWT signing secret
    /// * `ttl_seconds` - Token time-to-live in seconds
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Issue a signed token for `subject`
    pub fn issue(&self, subject: &str, role: UserRole) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now + self.ttl;

        let claims = Claims {
            sub: subject.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Check signature, structure and expiry. Performs no I/O.
    pub fn inspect(&self, token: &str) -> TokenStatus {
        match decode::<Claims>(token, &self.decoding_key, &validation(true)) {
            Ok(data) => TokenStatus::Valid(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => TokenStatus::Expired,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected malformed or forged token");
                TokenStatus::Invalid
            }
        }
    }

    /// Decode a correctly signed token even if it has expired
    pub fn decode_ignoring_expiry(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding_key, &validation(false))
            .map(|data| data.claims)
            .ok()
    }
}

fn validation(validate_exp: bool) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = validate_exp;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    #[test]
    fn test_issue_and_inspect() {
        let issuer = TokenIssuer::new(SECRET, 86_400);
        let token = issuer.issue("alice", UserRole::Customer).unwrap();
        assert!(!token.is_empty());

        match issuer.inspect(&token) {
            TokenStatus::Valid(claims) => {
                assert_eq!(claims.sub, "alice");
                assert_eq!(claims.role, "customer");
                assert_eq!(claims.exp - claims.iat, 86_400);
            }
            other => panic!("expected valid token, got {:?}", other),
        }
    }

    #[test]
    fn test_tokens_are_unique_per_issue() {
        let issuer = TokenIssuer::new(SECRET, 900);
        let first = issuer.issue("alice", UserRole::Customer).unwrap();
        let second = issuer.issue("alice", UserRole::Customer).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_expired_token() {
        let issuer = TokenIssuer::new(SECRET, -60);
        let token = issuer.issue("alice", UserRole::Customer).unwrap();
        assert_eq!(issuer.inspect(&token), TokenStatus::Expired);

        let claims = issuer.decode_ignoring_expiry(&token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_invalid_token() {
        let issuer = TokenIssuer::new(SECRET, 900);
        assert_eq!(issuer.inspect("invalid.token.here"), TokenStatus::Invalid);
        assert_eq!(issuer.inspect(""), TokenStatus::Invalid);
        assert!(issuer.decode_ignoring_expiry("invalid.token.here").is_none());
    }

    #[test]
    fn test_wrong_secret() {
        let token = TokenIssuer::new("secret1", 900)
            .issue("alice", UserRole::Admin)
            .unwrap();
        let other = TokenIssuer::new("secret2", 900);
        assert_eq!(other.inspect(&token), TokenStatus::Invalid);
        assert!(other.decode_ignoring_expiry(&token).is_none());
    }

    #[test]
    fn test_expired_token_with_wrong_secret_is_invalid() {
        let token = TokenIssuer::new("secret1", -60)
            .issue("alice", UserRole::Customer)
            .unwrap();
        assert_eq!(
            TokenIssuer::new("secret2", 900).inspect(&token),
            TokenStatus::Invalid
        );
    }
}
