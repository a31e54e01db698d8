//! Data models for KodBank backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use std::fmt;

pub mod auth;
pub use auth::*;

/// User model
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub uid: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// User roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }

    /// Parse the role carried in a token claim
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(UserRole::Customer),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields that must be unique across all users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Uid,
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniqueField::Uid => "UID",
            UniqueField::Username => "Username",
            UniqueField::Email => "Email",
        })
    }
}

/// Values needed to insert a user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uid: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub balance: i64,
}

/// Session token row from the `user_tokens` ledger
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionToken {
    pub id: i64,
    /// Username that owns the session
    pub owner: String,
    /// SHA-256 hex digest of the issued JWT
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}
