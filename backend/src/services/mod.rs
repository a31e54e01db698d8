//! Business logic services for KodBank

pub mod account;

pub use account::{AccountService, CURRENCY};
