//! Account queries for authenticated users

use std::sync::Arc;

use crate::store::{StoreError, UserStore};

/// Currency symbol reported with balances
pub const CURRENCY: &str = "₹";

/// Read-only account operations
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Current balance of `username`. A user without a row reads as zero.
    pub async fn balance(&self, username: &str) -> Result<i64, StoreError> {
        let balance = self.users.balance(username).await?;
        if balance.is_none() {
            tracing::warn!(username = %username, "Balance requested for a user with no row");
        }
        Ok(balance.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, UserRole};
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn test_balance_of_existing_user() {
        let store = Arc::new(InMemoryStore::new());
        store
            .create(NewUser {
                uid: "U1".to_string(),
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
                email: "a@x.com".to_string(),
                phone: "555".to_string(),
                role: UserRole::Customer,
                balance: 100_000,
            })
            .await
            .unwrap();

        let service = AccountService::new(store);
        assert_eq!(service.balance("alice").await.unwrap(), 100_000);
    }

    #[tokio::test]
    async fn test_missing_user_reads_as_zero() {
        let service = AccountService::new(Arc::new(InMemoryStore::new()));
        assert_eq!(service.balance("ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(InMemoryStore::new());
        store.set_offline(true);
        let service = AccountService::new(store);
        assert!(service.balance("alice").await.is_err());
    }
}
