//! Shared state handed to the router

mod app_state;

pub use app_state::AppState;
