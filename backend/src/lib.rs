//! KodBank Backend Library
//!
//! This library exports the core modules for the KodBank backend server:
//! credential storage, session issuance and verification, and the HTTP API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
