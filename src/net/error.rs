//! API error type and server `detail` extraction.
//!
//! ERROR HANDLING
//! ==============
//! Session-validity failures (`SessionExpired`, `Unauthorized`) are already
//! acted on centrally by the client before they reach a caller. Everything
//! else is passed through unchanged for caller-specific display.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http client build failed: {0}")]
    ClientBuild(String),

    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A stored token was invalid; it was cleared and the request never sent.
    #[error("session expired; login required")]
    SessionExpired,

    /// The server answered 401; the stored token was cleared.
    #[error("unauthorized")]
    Unauthorized { payload: Option<Value> },

    #[error("server returned status {status}")]
    Status { status: u16, payload: Option<Value> },

    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `detail` member of the server's error body, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&Value> {
        match self {
            Self::Unauthorized { payload } | Self::Status { payload, .. } => payload.as_ref()?.get("detail"),
            _ => None,
        }
    }

    /// Human-readable message for this failure, falling back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        detail_message(self.detail(), fallback)
    }

    /// Whether the client already cleared the session for this error.
    #[must_use]
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthorized { .. })
    }
}

/// Render a server `detail` value for display.
///
/// Non-empty strings are shown as-is; objects and arrays (validation error
/// lists) are serialized to JSON text; anything else uses `fallback`.
#[must_use]
pub fn detail_message(detail: Option<&Value>, fallback: &str) -> String {
    match detail {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(structured @ (Value::Object(_) | Value::Array(_))) => structured.to_string(),
        _ => fallback.to_owned(),
    }
}
