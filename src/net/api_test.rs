use super::*;
use crate::auth::token_store::MemoryTokenStore;
use crate::config::ClientConfig;
use crate::net::types::Frequency;
use crate::state::events::EventBus;
use crate::test_helpers::{live_token, spawn_api};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

#[test]
fn journal_entry_path_formats_id() {
    assert_eq!(journal_entry_path(12), "/journal/entries/12");
}

#[test]
fn habit_paths_format_id() {
    assert_eq!(habit_path(3), "/habits/3");
    assert_eq!(habit_check_in_path(3), "/habits/3/checkin");
}

fn entry_json(id: i64, text: &str) -> Value {
    json!({
        "id": id,
        "entry_text": text,
        "mood": "positive",
        "sentiment_score": 0.8,
        "created_at": "2024-01-01T09:00:00"
    })
}

async fn fake_api() -> String {
    let router = Router::new()
        .route(
            "/journal/entries",
            get(|| async { Json(json!([entry_json(1, "first"), entry_json(2, "second")])) }).post(
                |Json(body): Json<Value>| async move {
                    let text = body["entry_text"].as_str().unwrap_or_default().to_owned();
                    Json(entry_json(9, &text))
                },
            ),
        )
        .route(
            "/journal/entries/{id}",
            get(|Path(id): Path<i64>| async move { Json(entry_json(id, "one")) })
                .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    let text = body["entry_text"].as_str().unwrap_or_default().to_owned();
                    Json(entry_json(id, &text))
                })
                .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/habits",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "id": 4,
                    "habit_name": body["habit_name"],
                    "frequency": body["frequency"],
                    "streak": 0,
                    "created_at": "2024-01-01T00:00:00"
                }))
            }),
        )
        .route("/habits/{id}", put(|| async { (StatusCode::NOT_FOUND, Json(json!({ "detail": "Habit not found" }))) }))
        .route(
            "/habits/{id}/checkin",
            post(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                let mut out = body.clone();
                out["id"] = json!(id * 10);
                out["created_at"] = json!("2024-01-02T08:00:00");
                Json(out)
            }),
        )
        .route(
            "/analytics/habits",
            get(|| async { Json(json!([{ "id": 1, "name": "Run", "completed_count": 4, "missed_count": 4 }])) }),
        )
        .route(
            "/analytics/mood",
            get(|| async { Json(json!([{ "date": "2024-01-01", "sentiment": 0.25 }])) }),
        );
    spawn_api(router).await
}

async fn client() -> ApiClient {
    let base = fake_api().await;
    let store = Arc::new(MemoryTokenStore::with_token(&live_token("alice")));
    ApiClient::new(ClientConfig::with_base_url(&base).unwrap(), store, EventBus::default()).unwrap()
}

#[tokio::test]
async fn journal_crud_round_trip() {
    let client = client().await;

    let entries = list_journal_entries(&client).await.unwrap();
    assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);

    let created = create_journal_entry(
        &client,
        &NewJournalEntry { entry_text: "new thoughts".into(), mood: None, tags: vec![] },
    )
    .await
    .unwrap();
    assert_eq!(created.id, 9);
    assert_eq!(created.entry_text, "new thoughts");

    let fetched = get_journal_entry(&client, 5).await.unwrap();
    assert_eq!(fetched.id, 5);

    let updated = update_journal_entry(
        &client,
        5,
        &NewJournalEntry { entry_text: "edited".into(), mood: Some("neutral".into()), tags: vec![] },
    )
    .await
    .unwrap();
    assert_eq!(updated.entry_text, "edited");

    delete_journal_entry(&client, 5).await.unwrap();
}

#[tokio::test]
async fn create_habit_and_check_in() {
    let client = client().await;

    let habit = create_habit(
        &client,
        &HabitInput { habit_name: "Meditate".into(), frequency: Frequency::Daily, description: None },
    )
    .await
    .unwrap();
    assert_eq!(habit.habit_name, "Meditate");
    assert_eq!(habit.frequency, Frequency::Daily);

    let recorded = check_in(&client, habit.id, &CheckInInput { mood: 8, energy: 6, stress: 3, notes: None })
        .await
        .unwrap();
    assert_eq!(recorded.id, 40);
    assert_eq!(recorded.scores.mood, 8);
}

#[tokio::test]
async fn update_missing_habit_surfaces_detail() {
    let client = client().await;

    let err = update_habit(
        &client,
        99,
        &HabitInput { habit_name: "x".into(), frequency: Frequency::Weekly, description: None },
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message("Update failed"), "Habit not found");
}

#[tokio::test]
async fn analytics_endpoints_decode() {
    let client = client().await;

    let habits = habit_stats(&client).await.unwrap();
    assert_eq!(habits[0].completion_rate(), Some(0.5));

    let mood = mood_trends(&client).await.unwrap();
    assert_eq!(mood, vec![MoodPoint { date: "2024-01-01".into(), sentiment: 0.25 }]);
}
