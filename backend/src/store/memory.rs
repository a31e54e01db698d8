//! In-memory store used by tests and local demos

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::{token_digest, StoreError, TokenLedger, UserStore};
use crate::models::{NewUser, SessionToken, UniqueField, User};

/// Implements both [`UserStore`] and [`TokenLedger`] over vectors guarded by
/// async locks. Uniqueness is enforced the same way the `users` table does.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    tokens: RwLock<Vec<SessionToken>>,
    next_user_id: AtomicI64,
    next_token_id: AtomicI64,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of ledger rows currently held for `owner`
    pub async fn session_count(&self, owner: &str) -> usize {
        self.tokens
            .read()
            .await
            .iter()
            .filter(|row| row.owner == owner)
            .count()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }

    async fn find_user<F>(&self, predicate: F) -> Result<Option<User>, StoreError>
    where
        F: Fn(&User) -> bool + Send,
    {
        self.ensure_online()?;
        Ok(self.users.read().await.iter().find(|u| predicate(u)).cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_user(|u| u.username == username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_user(|u| u.email == email).await
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, StoreError> {
        self.find_user(|u| u.uid == uid).await
    }

    async fn create(&self, user: NewUser) -> Result<i64, StoreError> {
        self.ensure_online()?;
        let mut users = self.users.write().await;

        for existing in users.iter() {
            if existing.uid == user.uid {
                return Err(StoreError::Duplicate(UniqueField::Uid));
            }
            if existing.username == user.username {
                return Err(StoreError::Duplicate(UniqueField::Username));
            }
            if existing.email == user.email {
                return Err(StoreError::Duplicate(UniqueField::Email));
            }
        }

        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
        users.push(User {
            id,
            uid: user.uid,
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            phone: user.phone,
            role: user.role,
            balance: user.balance,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn balance(&self, username: &str) -> Result<Option<i64>, StoreError> {
        Ok(self
            .find_user(|u| u.username == username)
            .await?
            .map(|u| u.balance))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_online()
    }
}

#[async_trait]
impl TokenLedger for InMemoryStore {
    async fn insert(&self, owner: &str, token: &str) -> Result<(), StoreError> {
        self.ensure_online()?;
        let id = self.next_token_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.tokens.write().await.push(SessionToken {
            id,
            owner: owner.to_string(),
            token_hash: token_digest(token),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SessionToken>, StoreError> {
        self.ensure_online()?;
        let digest = token_digest(token);
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .filter(|row| row.token_hash == digest)
            .max_by_key(|row| (row.created_at, row.id))
            .cloned())
    }

    async fn revoke_by_owner(&self, owner: &str) -> Result<u64, StoreError> {
        self.ensure_online()?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|row| row.owner != owner);
        Ok((before - tokens.len()) as u64)
    }

    async fn revoke_token(&self, token: &str) -> Result<u64, StoreError> {
        self.ensure_online()?;
        let digest = token_digest(token);
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|row| row.token_hash != digest);
        Ok((before - tokens.len()) as u64)
    }
}
