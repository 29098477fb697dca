//! Auth-session controller for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the in-memory user profile and publishes [`SessionState`] to route
//! guards and user-aware views. Built from injected parts (backend, token
//! store, event bus) so each application or test gets its own instance.
//!
//! ORDERING
//! ========
//! Each state-settling operation takes a fresh generation number. Results
//! of an operation overtaken by a later one are dropped without touching the
//! store or the state, so a `logout` issued while a profile fetch is in
//! flight always wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use super::events::EventBus;
use crate::auth::token;
use crate::auth::token_store::{self, TokenStore, TokenStoreError};
use crate::net::api;
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{Credentials, Registration, TokenResponse, UserProfile};

pub const LOGIN_SUCCESS: &str = "Welcome back!";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_SUCCESS: &str = "Registration successful!";
pub const REGISTER_FAILED: &str = "Registration failed";
pub const PROFILE_FAILED: &str = "Could not load your profile";
pub const LOGOUT_SUCCESS: &str = "Logged out successfully";

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Initializing,
    Authenticated(UserProfile),
    Anonymous,
}

impl SessionState {
    /// Initialization has finished one way or the other.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Anonymous)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The server refused the login/registration.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },

    /// A token was issued but the profile could not be fetched; the token
    /// has been discarded.
    #[error("{message}")]
    ProfileUnavailable {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to persist session token: {0}")]
    Store(#[from] TokenStoreError),

    /// A later session operation (e.g. logout) overtook this one.
    #[error("superseded by a newer session operation")]
    Superseded,
}

// =============================================================================
// BACKEND
// =============================================================================

/// Remote calls the controller depends on.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<TokenResponse, ApiError>;
    async fn fetch_profile(&self) -> Result<UserProfile, ApiError>;
}

#[async_trait::async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        api::login(self, credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<TokenResponse, ApiError> {
        api::register(self, registration).await
    }

    async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        api::fetch_profile(self).await
    }
}

struct Messages {
    success: &'static str,
    failure: &'static str,
}

const LOGIN_MESSAGES: Messages = Messages { success: LOGIN_SUCCESS, failure: LOGIN_FAILED };
const REGISTER_MESSAGES: Messages = Messages { success: REGISTER_SUCCESS, failure: REGISTER_FAILED };

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct AuthSession {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    events: EventBus,
    state: watch::Sender<SessionState>,
    generation: Mutex<u64>,
}

impl AuthSession {
    pub fn new(backend: Arc<dyn AuthBackend>, tokens: Arc<dyn TokenStore>, events: EventBus) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self { backend, tokens, events, state, generation: Mutex::new(0) }
    }

    /// Controller over `client`, sharing its token store and event bus.
    pub fn for_client(client: Arc<ApiClient>) -> Self {
        let tokens = Arc::clone(client.tokens());
        let events = client.events().clone();
        Self::new(client, tokens, events)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until initialization has settled and return the settled state.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        match rx.wait_for(SessionState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Restore the session from the stored token.
    pub async fn initialize(&self) -> SessionState {
        let generation = self.begin();
        self.commit(generation, || self.state.send_replace(SessionState::Initializing));

        match self.tokens.get() {
            None => {
                self.settle_anonymous(generation, false);
            }
            Some(stored) if !token::is_valid(&stored) => {
                tracing::info!("stored token expired or malformed; discarding");
                self.settle_anonymous(generation, true);
            }
            Some(_) => match self.backend.fetch_profile().await {
                Ok(profile) => {
                    if self.settle_authenticated(generation, profile) {
                        tracing::info!("session restored");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "profile fetch failed; discarding session");
                    self.settle_anonymous(generation, true);
                }
            },
        }
        self.state()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Rejected`] with a display message when the
    /// server refuses, [`SessionError::ProfileUnavailable`] when the profile
    /// fetch fails afterwards, or [`SessionError::Superseded`] when a later
    /// operation overtook this one.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let generation = self.begin();
        let credentials = Credentials { email: email.to_owned(), password: password.to_owned() };
        let response = self.backend.login(&credentials).await;
        self.establish(generation, response, &LOGIN_MESSAGES).await
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Same as [`AuthSession::login`].
    pub async fn register(&self, registration: &Registration) -> Result<UserProfile, SessionError> {
        let generation = self.begin();
        let response = self.backend.register(registration).await;
        self.establish(generation, response, &REGISTER_MESSAGES).await
    }

    /// Drop the session locally. Never fails and needs no network.
    pub fn logout(&self) {
        {
            let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
            *generation += 1;
            token_store::clear_quietly(self.tokens.as_ref());
            self.state.send_replace(SessionState::Anonymous);
        }
        tracing::info!("logged out");
        self.events.success(LOGOUT_SUCCESS);
    }

    async fn establish(
        &self,
        generation: u64,
        response: Result<TokenResponse, ApiError>,
        messages: &Messages,
    ) -> Result<UserProfile, SessionError> {
        let issued = match response {
            Ok(issued) => issued,
            Err(source) => {
                let message = source.user_message(messages.failure);
                tracing::info!(error = %source, "authentication rejected");
                // Anonymous never coexists with a stored token.
                if !self.settle_anonymous(generation, true) {
                    return Err(SessionError::Superseded);
                }
                self.events.error(message.clone());
                return Err(SessionError::Rejected { message, source });
            }
        };

        match self.commit(generation, || self.tokens.set(&issued.access_token)) {
            None => return Err(SessionError::Superseded),
            Some(Err(e)) => {
                self.settle_anonymous(generation, false);
                self.events.error(messages.failure);
                return Err(e.into());
            }
            Some(Ok(())) => {}
        }

        match self.backend.fetch_profile().await {
            Ok(profile) => {
                if !self.settle_authenticated(generation, profile.clone()) {
                    return Err(SessionError::Superseded);
                }
                tracing::info!(user = %profile.username, "signed in");
                self.events.success(messages.success);
                Ok(profile)
            }
            Err(source) => {
                tracing::warn!(error = %source, "profile fetch after sign-in failed; discarding token");
                let message = source.user_message(PROFILE_FAILED);
                if !self.settle_anonymous(generation, true) {
                    return Err(SessionError::Superseded);
                }
                self.events.error(message.clone());
                Err(SessionError::ProfileUnavailable { message, source })
            }
        }
    }

    fn begin(&self) -> u64 {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        *generation
    }

    /// Run `apply` only if `generation` is still the latest operation.
    fn commit<R>(&self, generation: u64, apply: impl FnOnce() -> R) -> Option<R> {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            tracing::debug!(generation, current = *current, "dropping superseded session result");
            return None;
        }
        Some(apply())
    }

    fn settle_authenticated(&self, generation: u64, profile: UserProfile) -> bool {
        self.commit(generation, || self.state.send_replace(SessionState::Authenticated(profile)))
            .is_some()
    }

    fn settle_anonymous(&self, generation: u64, clear_token: bool) -> bool {
        self.commit(generation, || {
            if clear_token {
                token_store::clear_quietly(self.tokens.as_ref());
            }
            self.state.send_replace(SessionState::Anonymous);
        })
        .is_some()
    }
}
