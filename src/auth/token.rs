//! Local JWT claim decoding and expiry checks.
//!
//! TRADE-OFFS
//! ==========
//! Signatures are not verified. This is a convenience check that keeps
//! obviously dead tokens off the wire; the server remains the authority.
//! Only the payload segment is read, so the header's `alg` (including
//! `none` or algorithms unknown to this crate) never affects the result.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

use super::token_store::TokenStore;

/// Claims carried by a session token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry as Unix seconds. A token without one is never valid.
    #[serde(default)]
    pub exp: Option<u64>,
    /// Subject identity, typically the username.
    #[serde(default)]
    pub sub: Option<String>,
    /// Any other claims, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// True when `exp` is present and strictly after `now`.
    #[must_use]
    pub fn is_live_at(&self, now: u64) -> bool {
        self.exp.is_some_and(|exp| exp > now)
    }
}

/// Current wall-clock time in Unix seconds.
#[must_use]
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// base64url, padded or not.
const SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode `token`'s claims without verifying the signature.
/// Returns `None` when the payload segment is missing, not base64url, or
/// not a JSON claims object.
#[must_use]
pub fn decode(token: &str) -> Option<Claims> {
    let Some(payload) = token.split('.').nth(1) else {
        tracing::debug!("token has no payload segment");
        return None;
    };
    let bytes = match SEGMENT.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "token payload is not base64url");
            return None;
        }
    };
    match serde_json::from_slice::<Claims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "token payload is not a claims object");
            None
        }
    }
}

/// Whether `token` decodes and expires strictly after `now`.
#[must_use]
pub fn is_valid_at(token: &str, now: u64) -> bool {
    decode(token).is_some_and(|claims| claims.is_live_at(now))
}

/// Whether `token` decodes and has not yet expired.
#[must_use]
pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, now_unix_secs())
}

/// Claims of the token currently held by `store`.
#[must_use]
pub fn stored_claims(store: &dyn TokenStore) -> Option<Claims> {
    decode(&store.get()?)
}

/// False when `store` is empty or holds an undecodable or expired token.
#[must_use]
pub fn stored_token_is_valid(store: &dyn TokenStore) -> bool {
    store.get().is_some_and(|token| is_valid(&token))
}
