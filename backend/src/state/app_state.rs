//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{AuthService, CookieConfig, PasswordHasher, TokenIssuer};
use crate::config::Config;
use crate::services::AccountService;
use crate::store::{TokenLedger, UserStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub account_service: Arc<AccountService>,
    pub cookie_config: CookieConfig,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        account_service: Arc<AccountService>,
        cookie_config: CookieConfig,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            cookie_config,
        }
    }

    /// Wire services over the given stores using runtime configuration
    pub fn from_config(
        config: &Config,
        users: Arc<dyn UserStore>,
        ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        let auth_service = AuthService::new(
            users.clone(),
            ledger,
            TokenIssuer::new(&config.jwt_secret, config.jwt_expires_in_seconds),
            PasswordHasher::new(config.bcrypt_cost),
            config.starting_balance,
        );

        Self::new(
            Arc::new(auth_service),
            Arc::new(AccountService::new(users)),
            CookieConfig::new(
                config.environment.is_production(),
                config.jwt_expires_in_seconds,
            ),
        )
    }
}

// Lets the session extractor reach the verifier without the whole state
impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
