//! Token persistence behind a small storage trait.
//!
//! DESIGN
//! ======
//! The store is pure storage: no decoding, no expiry checks. `FileTokenStore`
//! keeps a JSON document keyed by [`STORAGE_KEY`] so the session survives
//! process restarts the way browser storage survives page reloads.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Fixed key the bearer token is stored under.
pub const STORAGE_KEY: &str = "access_token";

/// Errors produced when writing or clearing persisted tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("token file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token file encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistent home of the current bearer token.
pub trait TokenStore: Send + Sync {
    /// Return the persisted token, if any.
    fn get(&self) -> Option<String>;

    /// Persist `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Clear the persisted token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn remove(&self) -> Result<(), TokenStoreError>;
}

/// Clear `store`, logging instead of failing. Used where clearing is a side
/// effect of some other decision (expired token, 401 response).
pub fn clear_quietly(store: &dyn TokenStore) {
    if let Err(e) = store.remove() {
        tracing::warn!(error = %e, "failed to clear stored token");
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.slot() = Some(token.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        *self.slot() = None;
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

/// Token store backed by a JSON file.
///
/// Reads never fail: a missing, unreadable, or corrupt file reads as "no
/// token". The mutex serializes read-modify-write cycles within one process.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<StoredSession> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io { path: self.path.clone(), source }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.read()?.access_token.filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let doc = StoredSession { access_token: Some(token.to_owned()) };
        let raw = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&self.path, raw).map_err(|e| self.io_error(e))
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
