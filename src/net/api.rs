//! Typed REST endpoint bindings.
//!
//! Every call goes through [`ApiClient`], so token attachment and 401
//! handling apply uniformly. Callers get `Result`s and decide how to surface
//! business errors.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{
    CheckIn, CheckInInput, Credentials, Habit, HabitInput, HabitSummary, JournalEntry, MoodPoint, NewJournalEntry,
    Registration, TokenResponse, UserProfile,
};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const PROFILE_PATH: &str = "/users/me";
pub const JOURNAL_PATH: &str = "/journal/entries";
pub const HABITS_PATH: &str = "/habits";

fn journal_entry_path(id: i64) -> String {
    format!("{JOURNAL_PATH}/{id}")
}

fn habit_path(id: i64) -> String {
    format!("{HABITS_PATH}/{id}")
}

fn habit_check_in_path(id: i64) -> String {
    format!("{HABITS_PATH}/{id}/checkin")
}

// =============================================================================
// AUTH
// =============================================================================

/// `POST /auth/login`.
///
/// # Errors
///
/// Returns the server's rejection (typically 401 with a `detail`) or a
/// transport failure.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
    client.post(LOGIN_PATH, credentials).await
}

/// `POST /auth/register`.
///
/// # Errors
///
/// Returns the server's rejection (e.g. 400 "Email already registered").
pub async fn register(client: &ApiClient, registration: &Registration) -> Result<TokenResponse, ApiError> {
    client.post(REGISTER_PATH, registration).await
}

/// `GET /users/me`.
///
/// # Errors
///
/// Returns an error when unauthenticated or on transport failure.
pub async fn fetch_profile(client: &ApiClient) -> Result<UserProfile, ApiError> {
    client.get(PROFILE_PATH).await
}

// =============================================================================
// JOURNAL
// =============================================================================

/// # Errors
///
/// See [`ApiError`].
pub async fn list_journal_entries(client: &ApiClient) -> Result<Vec<JournalEntry>, ApiError> {
    client.get(JOURNAL_PATH).await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn get_journal_entry(client: &ApiClient, id: i64) -> Result<JournalEntry, ApiError> {
    client.get(&journal_entry_path(id)).await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn create_journal_entry(client: &ApiClient, entry: &NewJournalEntry) -> Result<JournalEntry, ApiError> {
    client.post(JOURNAL_PATH, entry).await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn update_journal_entry(
    client: &ApiClient,
    id: i64,
    entry: &NewJournalEntry,
) -> Result<JournalEntry, ApiError> {
    client.put(&journal_entry_path(id), entry).await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn delete_journal_entry(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&journal_entry_path(id)).await
}

// =============================================================================
// HABITS
// =============================================================================

/// # Errors
///
/// See [`ApiError`].
pub async fn list_habits(client: &ApiClient) -> Result<Vec<Habit>, ApiError> {
    client.get(HABITS_PATH).await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn create_habit(client: &ApiClient, habit: &HabitInput) -> Result<Habit, ApiError> {
    client.post(HABITS_PATH, habit).await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn update_habit(client: &ApiClient, id: i64, habit: &HabitInput) -> Result<Habit, ApiError> {
    client.put(&habit_path(id), habit).await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn delete_habit(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&habit_path(id)).await
}

/// `POST /habits/{id}/checkin`.
///
/// # Errors
///
/// See [`ApiError`]; out-of-range scores come back as a 422 `Status`.
pub async fn check_in(client: &ApiClient, habit_id: i64, check_in: &CheckInInput) -> Result<CheckIn, ApiError> {
    client.post(&habit_check_in_path(habit_id), check_in).await
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Aggregate journal statistics; shape is owned by the server.
///
/// # Errors
///
/// See [`ApiError`].
pub async fn journal_stats(client: &ApiClient) -> Result<serde_json::Value, ApiError> {
    client.get("/analytics/journal").await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn habit_stats(client: &ApiClient) -> Result<Vec<HabitSummary>, ApiError> {
    client.get("/analytics/habits").await
}

/// # Errors
///
/// See [`ApiError`].
pub async fn mood_trends(client: &ApiClient) -> Result<Vec<MoodPoint>, ApiError> {
    client.get("/analytics/mood").await
}
