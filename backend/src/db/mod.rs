//! PostgreSQL pool and schema for the credential store and token ledger
//!
//! Every store call is a single short statement, and password hashing runs on
//! the blocking pool without holding a connection. The pool is therefore sized
//! for the request rate, not for bcrypt latency. One connection is kept warm
//! because each protected request performs a ledger lookup.

use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Database setup error
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] MigrateError),
}

/// Pool tuning derived from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a connection before the store reports
    /// itself unavailable
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PoolSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: 1.min(config.db_max_connections),
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

/// Open the pool used by the Postgres store adapters
pub async fn create_pool(config: &Config) -> Result<PgPool, DbError> {
    let settings = PoolSettings::from_config(config);
    tracing::info!(
        url = %config.database_url_masked(),
        max_connections = settings.max_connections,
        "Connecting to database"
    );

    let pool = settings
        .options()
        .connect(&config.database_url)
        .await
        .map_err(DbError::Connect)?;

    tracing::info!("Database pool ready");
    Ok(pool)
}

/// Apply the embedded migrations that create `users` and `user_tokens`
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database schema up to date");
    Ok(())
}
