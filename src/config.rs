//! Client configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Parsing goes through a key lookup function so tests can feed a map instead
//! of mutating the process environment.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A configured value could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    /// The base URL does not use an http(s) scheme.
    #[error("base URL must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),
}

/// Optional HTTP timeouts. `None` leaves the transport default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request: Option<Duration>,
    pub connect: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash.
    pub base_url: String,
    pub timeouts: HttpTimeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_URL.to_owned(), timeouts: HttpTimeouts::default() }
    }
}

impl ClientConfig {
    /// Build a config for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s).
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, timeouts: HttpTimeouts::default() })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `MINDMIRROR_API_URL`: default `http://localhost:8000`
    /// - `MINDMIRROR_REQUEST_TIMEOUT_SECS`: whole-request timeout
    /// - `MINDMIRROR_CONNECT_TIMEOUT_SECS`: connect timeout
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup("MINDMIRROR_API_URL") {
            Some(raw) if !raw.trim().is_empty() => normalize_base_url(&raw)?,
            _ => DEFAULT_API_URL.to_owned(),
        };
        let timeouts = HttpTimeouts {
            request: parse_secs("MINDMIRROR_REQUEST_TIMEOUT_SECS", lookup("MINDMIRROR_REQUEST_TIMEOUT_SECS"))?,
            connect: parse_secs("MINDMIRROR_CONNECT_TIMEOUT_SECS", lookup("MINDMIRROR_CONNECT_TIMEOUT_SECS"))?,
        };
        Ok(Self { base_url, timeouts })
    }

    /// Join an API path (leading slash optional) onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn parse_secs(key: &'static str, raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u64>()
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|_| ConfigError::InvalidValue { key, value: raw.clone() })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
