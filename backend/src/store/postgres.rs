//! PostgreSQL adapters for the user store and token ledger

use async_trait::async_trait;
use sqlx::PgPool;

use super::{token_digest, StoreError, TokenLedger, UserStore};
use crate::models::{NewUser, SessionToken, UniqueField, User};

/// Postgres error code for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                if let Some(field) = db_err.constraint().and_then(unique_field_for_constraint) {
                    return StoreError::Duplicate(field);
                }
            }
            return StoreError::Query(db_err.message().to_string());
        }

        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            _ => StoreError::Query(e.to_string()),
        }
    }
}

/// Map the default Postgres names of the `users` unique constraints
fn unique_field_for_constraint(constraint: &str) -> Option<UniqueField> {
    match constraint {
        "users_uid_key" => Some(UniqueField::Uid),
        "users_username_key" => Some(UniqueField::Username),
        "users_email_key" => Some(UniqueField::Email),
        _ => None,
    }
}

/// Credential store backed by the `users` table
#[derive(Clone)]
pub struct PgUserStore {
    db_pool: PgPool,
}

impl PgUserStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    async fn find_by_column(&self, query: &str, value: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(query)
            .bind(value)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_by_column(
            r#"
            SELECT id, uid, username, password_hash, email, phone, role, balance, created_at
            FROM users
            WHERE username = $1
            "#,
            username,
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_by_column(
            r#"
            SELECT id, uid, username, password_hash, email, phone, role, balance, created_at
            FROM users
            WHERE email = $1
            "#,
            email,
        )
        .await
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, StoreError> {
        self.find_by_column(
            r#"
            SELECT id, uid, username, password_hash, email, phone, role, balance, created_at
            FROM users
            WHERE uid = $1
            "#,
            uid,
        )
        .await
    }

    async fn create(&self, user: NewUser) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (uid, username, password_hash, email, phone, role, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING id
            "#,
        )
        .bind(&user.uid)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.role)
        .bind(user.balance)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(id)
    }

    async fn balance(&self, username: &str) -> Result<Option<i64>, StoreError> {
        let balance: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT balance FROM users WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(balance)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

/// Token ledger backed by the `user_tokens` table
#[derive(Clone)]
pub struct PgTokenLedger {
    db_pool: PgPool,
}

impl PgTokenLedger {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TokenLedger for PgTokenLedger {
    async fn insert(&self, owner: &str, token: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_tokens (username, token_hash, created_at)
            VALUES ($1, $2, NOW())
            "#,
        )
        .bind(owner)
        .bind(token_digest(token))
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SessionToken>, StoreError> {
        let row = sqlx::query_as::<_, SessionToken>(
            r#"
            SELECT id, username AS owner, token_hash, created_at
            FROM user_tokens
            WHERE token_hash = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(token_digest(token))
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row)
    }

    async fn revoke_by_owner(&self, owner: &str) -> Result<u64, StoreError> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM user_tokens WHERE username = $1
            "#,
        )
        .bind(owner)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        Ok(rows_affected)
    }

    async fn revoke_token(&self, token: &str) -> Result<u64, StoreError> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM user_tokens WHERE token_hash = $1
            "#,
        )
        .bind(token_digest(token))
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_constraint_names_map_to_fields() {
        assert_eq!(
            unique_field_for_constraint("users_uid_key"),
            Some(UniqueField::Uid)
        );
        assert_eq!(
            unique_field_for_constraint("users_username_key"),
            Some(UniqueField::Username)
        );
        assert_eq!(
            unique_field_for_constraint("users_email_key"),
            Some(UniqueField::Email)
        );
        assert_eq!(unique_field_for_constraint("users_pkey"), None);
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }
}
