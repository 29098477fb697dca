//! Wire DTOs for the Mind Mirror REST API.
//!
//! DESIGN
//! ======
//! Response types are lenient (`#[serde(default)]` on fields the backend has
//! historically omitted) so a schema drift on the server degrades to empty
//! values instead of a failed request.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Accept either a JSON string or number and hold it as a string.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body returned by the login and registration endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The signed-in user as returned by `GET /users/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// JOURNAL
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub entry_text: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub ai_reflection: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewJournalEntry {
    pub entry_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    pub tags: Vec<String>,
}

// =============================================================================
// HABITS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown frequency '{other}' (expected daily, weekly or monthly)")),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub habit_name: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub streak: u32,
    pub created_at: String,
    #[serde(default)]
    pub last_logged: Option<String>,
}

/// Create/update payload for a habit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HabitInput {
    pub habit_name: String,
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Daily check-in; each score is on a 1..=10 scale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInInput {
    pub mood: u8,
    pub energy: u8,
    pub stress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: i64,
    #[serde(flatten)]
    pub scores: CheckInInput,
    pub created_at: String,
}

// =============================================================================
// ANALYTICS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodPoint {
    pub date: String,
    pub sentiment: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed_count: u32,
    #[serde(default)]
    pub missed_count: u32,
}

impl HabitSummary {
    /// Completed share of tracked periods in `0.0..=1.0`; `None` before any
    /// period has been tracked.
    #[must_use]
    pub fn completion_rate(&self) -> Option<f64> {
        let total = u64::from(self.completed_count) + u64::from(self.missed_count);
        if total == 0 {
            return None;
        }
        // At most 2^33, well inside f64's exact integer range.
        #[allow(clippy::cast_precision_loss)]
        let total = total as f64;
        Some(f64::from(self.completed_count) / total)
    }
}
