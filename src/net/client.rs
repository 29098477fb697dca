//! HTTP client wrapper with session-aware request/response interception.
//!
//! ARCHITECTURE
//! ============
//! Every call passes through two checkpoints:
//!
//! 1. Before sending, the stored token is classified (see [`credential_for`]).
//!    A live token is attached as a bearer credential; a dead one clears the
//!    store, publishes `Navigate(Login)` and abandons the request.
//! 2. After receiving, a 401 clears the store and publishes `Navigate(Login)`
//!    no matter which endpoint produced it. Other failures pass through.
//!
//! No retries, no cancellation; timeouts only if configured.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::auth::token::{self, now_unix_secs};
use crate::auth::token_store::{self, TokenStore};
use crate::config::ClientConfig;
use crate::routes::Route;
use crate::state::events::EventBus;

/// How an outgoing request should authenticate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    Anonymous,
    /// A token is stored but undecodable or expired.
    Expired,
}

/// Classify the stored token at time `now`.
#[must_use]
pub fn credential_for(stored: Option<String>, now: u64) -> Credential {
    match stored {
        None => Credential::Anonymous,
        Some(token) if token::is_valid_at(&token, now) => Credential::Bearer(token),
        Some(_) => Credential::Expired,
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
    events: EventBus,
}

impl ApiClient {
    /// Build a client sharing `tokens` and `events` with the rest of the app.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>, events: EventBus) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeouts.request {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.timeouts.connect {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, config, tokens, events })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// `GET path`, decoding the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; session-ending errors have already cleared the store.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.prepare(Method::GET, path)?;
        self.execute(request, path).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.prepare(Method::POST, path)?.json(body);
        self.execute(request, path).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.prepare(Method::PUT, path)?.json(body);
        self.execute(request, path).await
    }

    /// `DELETE path`, ignoring any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.prepare(Method::DELETE, path)?;
        let _: serde::de::IgnoredAny = self.execute(request, path).await?;
        Ok(())
    }

    fn prepare(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        tracing::debug!(%method, path, "api request");
        let request = self.http.request(method, self.config.url(path));
        match credential_for(self.tokens.get(), now_unix_secs()) {
            Credential::Bearer(token) => Ok(request.bearer_auth(token)),
            Credential::Anonymous => Ok(request),
            Credential::Expired => {
                tracing::info!(path, "stored token expired or malformed; ending session");
                self.end_session();
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(path, "server rejected credentials; ending session");
            self.end_session();
            return Err(ApiError::Unauthorized { payload: parse_payload(&body) });
        }
        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "api error response");
            return Err(ApiError::Status { status: status.as_u16(), payload: parse_payload(&body) });
        }
        decode_body(&body)
    }

    fn end_session(&self) {
        token_store::clear_quietly(self.tokens.as_ref());
        self.events.navigate(Route::Login);
    }
}

fn parse_payload(body: &[u8]) -> Option<serde_json::Value> {
    serde_json::from_slice(body).ok()
}

/// Decode a success body; an empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) { b"null".as_slice() } else { body };
    Ok(serde_json::from_slice(body)?)
}
