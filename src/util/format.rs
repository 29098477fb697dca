//! Display formatting for journal and habit data.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use std::borrow::Cow;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

pub const DEFAULT_TRUNCATE_LEN: usize = 100;

/// Parse a server timestamp: RFC 3339, naive ISO-8601 (`T` or space
/// separated, optional fraction), or a bare date.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }
    let naive = raw.replacen(' ', "T", 1);
    let with_time = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    if let Ok(dt) = PrimitiveDateTime::parse(&naive, with_time) {
        return Some(dt);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

/// "Monday, January 1, 2024"
#[must_use]
pub fn format_date(raw: &str) -> Option<String> {
    let dt = parse_timestamp(raw)?;
    dt.format(format_description!("[weekday], [month repr:long] [day padding:none], [year]"))
        .ok()
}

/// "09:05 AM"
#[must_use]
pub fn format_time(raw: &str) -> Option<String> {
    let dt = parse_timestamp(raw)?;
    dt.format(format_description!("[hour repr:12]:[minute] [period]")).ok()
}

/// Cut `text` to `max_len` characters, appending `...` when shortened.
#[must_use]
pub fn truncate_text(text: &str, max_len: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_len) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
    }
}

#[must_use]
pub fn mood_emoji(mood: &str) -> &'static str {
    match mood {
        "very_negative" => "😢",
        "negative" => "😕",
        "positive" => "😊",
        "very_positive" => "😄",
        _ => "😐",
    }
}
