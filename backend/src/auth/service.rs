//! Authentication service
//!
//! Core business logic for registration, login and logout.

use std::sync::{Arc, OnceLock};

use thiserror::Error;
use validator::Validate;

use crate::models::{
    first_validation_message, LoginRequest, NewUser, RegisterRequest, UniqueField, UserRole,
};
use crate::store::{StoreError, TokenLedger, UserStore};

use super::jwt::{JwtError, TokenIssuer};
use super::password::{PasswordError, PasswordHasher, MAX_PASSWORD_BYTES};
use super::session::{SessionCheck, SessionVerifier};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} already exists")]
    Conflict(UniqueField),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => AuthError::Conflict(field),
            other => AuthError::Store(other),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub username: String,
    pub role: UserRole,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    ledger: Arc<dyn TokenLedger>,
    issuer: Arc<TokenIssuer>,
    verifier: SessionVerifier,
    hasher: PasswordHasher,
    starting_balance: i64,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        users: Arc<dyn UserStore>,
        ledger: Arc<dyn TokenLedger>,
        issuer: TokenIssuer,
        hasher: PasswordHasher,
        starting_balance: i64,
    ) -> Self {
        let issuer = Arc::new(issuer);
        let verifier = SessionVerifier::new(issuer.clone(), ledger.clone());
        Self {
            users,
            ledger,
            issuer,
            verifier,
            hasher,
            starting_balance,
        }
    }

    /// Register a new customer and return the store-assigned id
    pub async fn register(&self, req: RegisterRequest) -> Result<i64, AuthError> {
        let (uid, username, password, email, phone) = match (
            required(&req.uid),
            required(&req.username),
            required(&req.password),
            required(&req.email),
            required(&req.phone),
        ) {
            (Some(uid), Some(username), Some(password), Some(email), Some(phone)) => {
                (uid, username, password, email, phone)
            }
            _ => return Err(AuthError::Validation("All fields are required".to_string())),
        };

        req.validate()
            .map_err(|e| AuthError::Validation(first_validation_message(&e)))?;

        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Validation(format!(
                "Password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        let existing_username = self.users.find_by_username(username).await?;
        let existing_email = self.users.find_by_email(email).await?;
        let existing_uid = self.users.find_by_uid(uid).await?;

        if existing_username.is_some() {
            return Err(AuthError::Conflict(UniqueField::Username));
        }
        if existing_email.is_some() {
            return Err(AuthError::Conflict(UniqueField::Email));
        }
        if existing_uid.is_some() {
            return Err(AuthError::Conflict(UniqueField::Uid));
        }

        let password_hash = self.hasher.hash_blocking(password.to_string()).await?;

        let user_id = self
            .users
            .create(NewUser {
                uid: uid.to_string(),
                username: username.to_string(),
                password_hash,
                email: email.to_string(),
                phone: phone.to_string(),
                role: UserRole::Customer,
                balance: self.starting_balance,
            })
            .await?;

        tracing::info!(user_id, username = %username, "User registered");

        Ok(user_id)
    }

    /// Check credentials, issue a token and record it in the ledger
    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome, AuthError> {
        let (Some(username), Some(password)) = (required(&req.username), required(&req.password))
        else {
            return Err(AuthError::Validation(
                "Username and password required".to_string(),
            ));
        };

        // No stored password is longer than bcrypt's input limit
        if password.len() > MAX_PASSWORD_BYTES {
            tracing::info!(username = %username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = self.users.find_by_username(username).await?;

        // Unknown users still pay for one hash comparison so timing does not
        // reveal which usernames exist
        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash().await?,
        };
        let password_valid = self
            .hasher
            .verify_blocking(password.to_string(), stored_hash)
            .await?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::info!(username = %username, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.issuer.issue(&user.username, user.role)?;
        self.ledger.insert(&user.username, &token).await?;

        tracing::info!(username = %user.username, "Login successful");

        Ok(LoginOutcome {
            token,
            username: user.username,
            role: user.role,
        })
    }

    /// Revoke every session of the token's owner.
    ///
    /// Best effort: an absent, forged or unreadable token and store failures
    /// are logged and otherwise ignored.
    pub async fn logout(&self, token: Option<&str>) {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return;
        };

        let Some(claims) = self.issuer.decode_ignoring_expiry(token) else {
            tracing::debug!("Logout with an unreadable token, nothing to revoke");
            return;
        };

        match self.ledger.revoke_by_owner(&claims.sub).await {
            Ok(revoked) => {
                tracing::info!(username = %claims.sub, revoked, "Revoked all sessions")
            }
            Err(e) => {
                tracing::warn!(username = %claims.sub, error = %e, "Failed to revoke sessions on logout")
            }
        }
    }

    /// Revoke only the session carried by `token`
    pub async fn logout_session(&self, token: &str) -> Result<u64, AuthError> {
        let revoked = self.ledger.revoke_token(token).await?;
        tracing::info!(revoked, "Revoked current session");
        Ok(revoked)
    }

    /// Verify a presented session token
    pub async fn authenticate(&self, token: Option<&str>) -> Result<SessionCheck, StoreError> {
        self.verifier.verify(token).await
    }

    /// Check the credential store is reachable
    pub async fn store_health(&self) -> Result<(), StoreError> {
        self.users.ping().await
    }

    async fn dummy_hash(&self) -> Result<String, PasswordError> {
        static DUMMY_HASH: OnceLock<String> = OnceLock::new();
        if let Some(hash) = DUMMY_HASH.get() {
            return Ok(hash.clone());
        }
        let hash = self
            .hasher
            .hash_blocking("kodbank-timing-equaliser".to_string())
            .await?;
        Ok(DUMMY_HASH.get_or_init(|| hash).clone())
    }
}

/// Non-blank value of an optional form field
fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
