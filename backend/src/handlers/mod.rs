//! API handlers for the KodBank backend

pub mod account;
pub mod auth;
pub mod system;

pub use account::get_balance;
pub use auth::{login, logout, logout_session, register};
pub use system::{health_check, method_not_allowed, not_found, root};

// Re-export AuthenticatedUser for handler use; its extractor lives in middleware
pub use crate::auth::AuthenticatedUser;
