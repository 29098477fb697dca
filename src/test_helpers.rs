//! Shared fixtures for unit tests: signed tokens and an in-process fake API.

use axum::Router;
use jsonwebtoken::{EncodingKey, Header};

use crate::auth::token::now_unix_secs;

/// HS256 token for `sub` expiring `exp_offset` seconds from now.
pub fn token_expiring_in(sub: &str, exp_offset: i64) -> String {
    let exp = now_unix_secs().saturating_add_signed(exp_offset);
    let claims = serde_json::json!({ "sub": sub, "exp": exp });
    jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret"))
        .expect("test token should encode")
}

pub fn live_token(sub: &str) -> String {
    token_expiring_in(sub, 3600)
}

pub fn expired_token(sub: &str) -> String {
    token_expiring_in(sub, -1)
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_api(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener should have an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake api should serve");
    });
    format!("http://{addr}")
}
