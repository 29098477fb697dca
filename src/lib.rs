//! # mindmirror
//!
//! Typed client for the Mind Mirror journaling and habit-tracking API.
//!
//! This crate owns the client-side session lifecycle (token storage, local
//! expiry checks, request/response interception, auth state propagation),
//! typed endpoint bindings, route guards, and display formatting. Front ends
//! such as `mindmirror-cli` wire these together and react to [`state::events`].

pub mod auth;
pub mod config;
pub mod net;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

pub use auth::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use config::ClientConfig;
pub use net::client::ApiClient;
pub use net::error::ApiError;
pub use state::events::{AppEvent, EventBus};
pub use state::session::{AuthSession, SessionError, SessionState};
