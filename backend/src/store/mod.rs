//! Persistence ports for users and the session token ledger
//!
//! Services depend on these traits rather than on a pool so the Postgres
//! adapters can be swapped for the in-memory store in tests.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{NewUser, SessionToken, UniqueField, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PgTokenLedger, PgUserStore};

/// Errors surfaced by store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} already exists")]
    Duplicate(UniqueField),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Credential store over the `users` table
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user and return the store-assigned id
    async fn create(&self, user: NewUser) -> Result<i64, StoreError>;

    /// Balance for `username`, `None` when no such user exists
    async fn balance(&self, username: &str) -> Result<Option<i64>, StoreError>;

    /// Round-trip to the backing store
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Allow-list of issued session tokens, keyed by owner username.
///
/// Implementations never keep the raw token; they hash it with
/// [`token_digest`] on every call.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    async fn insert(&self, owner: &str, token: &str) -> Result<(), StoreError>;

    /// Exact match lookup. When the same token was recorded more than once
    /// the most recently created row wins.
    async fn find_by_token(&self, token: &str) -> Result<Option<SessionToken>, StoreError>;

    /// Delete every session of `owner`, returning the number of rows removed
    async fn revoke_by_owner(&self, owner: &str) -> Result<u64, StoreError>;

    /// Delete only the rows recorded for `token`
    async fn revoke_token(&self, token: &str) -> Result<u64, StoreError>;
}

/// SHA-256 hex digest stored in place of a token
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
