use super::*;
use serde_json::json;

// =============================================================================
// AUTH
// =============================================================================

#[test]
fn user_profile_accepts_numeric_id_and_keeps_extra_fields() {
    let profile: UserProfile = serde_json::from_value(json!({
        "id": 42,
        "username": "alice",
        "email": "alice@example.com",
        "is_active": true
    }))
    .unwrap();
    assert_eq!(profile.id, "42");
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.email.as_deref(), Some("alice@example.com"));
    assert_eq!(profile.extra.get("is_active"), Some(&json!(true)));
}

#[test]
fn user_profile_accepts_string_id_without_email() {
    let profile: UserProfile = serde_json::from_value(json!({ "id": "u-1", "username": "bob" })).unwrap();
    assert_eq!(profile.id, "u-1");
    assert!(profile.email.is_none());
}

#[test]
fn user_profile_rejects_object_id() {
    let result = serde_json::from_value::<UserProfile>(json!({ "id": {}, "username": "x" }));
    assert!(result.is_err());
}

#[test]
fn token_response_token_type_optional() {
    let token: TokenResponse = serde_json::from_value(json!({ "access_token": "t1" })).unwrap();
    assert_eq!(token.access_token, "t1");
    assert!(token.token_type.is_none());
}

#[test]
fn credentials_serialize_as_email_password() {
    let body = serde_json::to_value(Credentials { email: "a@b.c".into(), password: "pw".into() }).unwrap();
    assert_eq!(body, json!({ "email": "a@b.c", "password": "pw" }));
}

// =============================================================================
// JOURNAL
// =============================================================================

#[test]
fn journal_entry_tolerates_missing_optional_fields() {
    let entry: JournalEntry = serde_json::from_value(json!({
        "id": 7,
        "entry_text": "A good day",
        "created_at": "2024-01-01T09:00:00"
    }))
    .unwrap();
    assert_eq!(entry.id, 7);
    assert!(entry.mood.is_none());
    assert!(entry.tags.is_empty());
}

#[test]
fn new_journal_entry_omits_absent_mood() {
    let body = serde_json::to_value(NewJournalEntry { entry_text: "hi".into(), mood: None, tags: vec![] }).unwrap();
    assert_eq!(body, json!({ "entry_text": "hi", "tags": [] }));
}

// =============================================================================
// HABITS
// =============================================================================

#[test]
fn frequency_parses_case_insensitively() {
    assert_eq!("Daily".parse::<Frequency>(), Ok(Frequency::Daily));
    assert_eq!(" weekly ".parse::<Frequency>(), Ok(Frequency::Weekly));
    assert!("yearly".parse::<Frequency>().is_err());
}

#[test]
fn frequency_wire_format_is_lowercase() {
    assert_eq!(serde_json::to_value(Frequency::Monthly).unwrap(), json!("monthly"));
    assert_eq!(Frequency::Monthly.to_string(), "monthly");
}

#[test]
fn habit_defaults_streak_and_last_logged() {
    let habit: Habit = serde_json::from_value(json!({
        "id": 1,
        "habit_name": "Meditate",
        "frequency": "daily",
        "created_at": "2024-01-01T00:00:00"
    }))
    .unwrap();
    assert_eq!(habit.streak, 0);
    assert!(habit.last_logged.is_none());
}

#[test]
fn check_in_flattens_scores() {
    let check_in: CheckIn = serde_json::from_value(json!({
        "id": 3,
        "mood": 7,
        "energy": 5,
        "stress": 2,
        "created_at": "2024-01-01T00:00:00"
    }))
    .unwrap();
    assert_eq!(check_in.scores, CheckInInput { mood: 7, energy: 5, stress: 2, notes: None });
}

// =============================================================================
// ANALYTICS
// =============================================================================

#[test]
fn completion_rate_none_without_history() {
    let summary = HabitSummary {
        id: "1".into(),
        name: "Run".into(),
        description: None,
        completed_count: 0,
        missed_count: 0,
    };
    assert_eq!(summary.completion_rate(), None);
}

#[test]
fn completion_rate_is_completed_share() {
    let summary: HabitSummary =
        serde_json::from_value(json!({ "id": 2, "name": "Read", "completed_count": 3, "missed_count": 1 })).unwrap();
    assert_eq!(summary.completion_rate(), Some(0.75));
}

#[test]
fn completion_rate_handles_counts_at_the_u32_limit() {
    let summary = HabitSummary {
        id: "3".into(),
        name: "Meditate".into(),
        description: None,
        completed_count: u32::MAX,
        missed_count: 1,
    };
    let rate = summary.completion_rate().expect("history exists");
    assert!(rate > 0.999_999 && rate < 1.0, "rate was {rate}");

    let all_missed = HabitSummary { completed_count: 0, missed_count: u32::MAX, ..summary };
    assert_eq!(all_missed.completion_rate(), Some(0.0));
}
