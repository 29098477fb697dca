//! Fake Mind Mirror API for end-to-end session tests.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};

pub const EMAIL: &str = "alice@example.com";
pub const PASSWORD: &str = "correct horse";

pub fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

pub fn token_with_exp(sub: &str, exp: u64) -> String {
    let claims = json!({ "sub": sub, "exp": exp });
    jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret"))
        .expect("token should encode")
}

#[derive(Clone, Default)]
pub struct FakeApi {
    /// Token the server currently accepts.
    pub issued: Arc<Mutex<Option<String>>>,
    /// Authorization header of every request, in arrival order.
    pub seen: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl FakeApi {
    fn record(&self, path: &str, headers: &HeaderMap) -> Option<String> {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.seen.lock().unwrap().push((path.to_owned(), auth.clone()));
        auth
    }

    fn authorized(&self, auth: Option<&str>) -> bool {
        let issued = self.issued.lock().unwrap();
        match (auth, issued.as_deref()) {
            (Some(header), Some(token)) => header == format!("Bearer {token}"),
            _ => false,
        }
    }

    pub fn seen(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Could not validate credentials" })))
}

async fn login(State(api): State<FakeApi>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    api.record("/auth/login", &headers);
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        let token = token_with_exp("alice", now() + 3600);
        *api.issued.lock().unwrap() = Some(token.clone());
        return (StatusCode::OK, Json(json!({ "access_token": token, "token_type": "bearer" })));
    }
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Incorrect username or password" })))
}

async fn me(State(api): State<FakeApi>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let auth = api.record("/users/me", &headers);
    if !api.authorized(auth.as_deref()) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "id": 1, "username": "alice", "email": EMAIL })))
}

async fn entries(State(api): State<FakeApi>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let auth = api.record("/journal/entries", &headers);
    if !api.authorized(auth.as_deref()) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([{ "id": 1, "entry_text": "Slept well", "mood": "positive", "created_at": "2024-01-01T08:00:00" }])),
    )
}

/// Start the fake API and return its base URL and shared state.
pub async fn spawn() -> (String, FakeApi) {
    let api = FakeApi::default();
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/users/me", get(me))
        .route("/journal/entries", get(entries))
        .with_state(api.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), api)
}
