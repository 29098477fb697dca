use super::*;

// =============================================================================
// parse_timestamp / format_date / format_time
// =============================================================================

#[test]
fn format_date_naive_iso() {
    assert_eq!(
        format_date("2024-01-01T09:05:00").as_deref(),
        Some("Monday, January 1, 2024")
    );
}

#[test]
fn format_date_with_fraction_and_space_separator() {
    assert_eq!(
        format_date("2024-02-29 23:59:59.123456").as_deref(),
        Some("Thursday, February 29, 2024")
    );
}

#[test]
fn format_date_rfc3339_keeps_its_own_offset() {
    assert_eq!(
        format_date("2024-03-10T08:00:00+02:00").as_deref(),
        Some("Sunday, March 10, 2024")
    );
}

#[test]
fn format_date_bare_date() {
    assert_eq!(format_date("2023-12-25").as_deref(), Some("Monday, December 25, 2023"));
}

#[test]
fn format_time_morning_and_afternoon() {
    assert_eq!(format_time("2024-01-01T09:05:00").as_deref(), Some("09:05 AM"));
    assert_eq!(format_time("2024-01-01T13:30:00Z").as_deref(), Some("01:30 PM"));
}

#[test]
fn unparseable_timestamps_yield_none() {
    assert_eq!(format_date("yesterday"), None);
    assert_eq!(format_time(""), None);
}

// =============================================================================
// truncate_text
// =============================================================================

#[test]
fn truncate_short_text_is_borrowed_unchanged() {
    let out = truncate_text("short", 10);
    assert!(matches!(out, Cow::Borrowed("short")));
}

#[test]
fn truncate_exact_length_is_unchanged() {
    assert_eq!(truncate_text("abcde", 5), "abcde");
}

#[test]
fn truncate_long_text_appends_ellipsis() {
    assert_eq!(truncate_text("abcdefgh", 3), "abc...");
}

#[test]
fn truncate_counts_characters_not_bytes() {
    assert_eq!(truncate_text("ééééé", 2), "éé...");
}

#[test]
fn truncate_default_len() {
    let long = "x".repeat(DEFAULT_TRUNCATE_LEN + 1);
    assert_eq!(truncate_text(&long, DEFAULT_TRUNCATE_LEN).len(), DEFAULT_TRUNCATE_LEN + 3);
}

// =============================================================================
// mood_emoji
// =============================================================================

#[test]
fn mood_emoji_known_moods() {
    assert_eq!(mood_emoji("very_negative"), "😢");
    assert_eq!(mood_emoji("negative"), "😕");
    assert_eq!(mood_emoji("neutral"), "😐");
    assert_eq!(mood_emoji("positive"), "😊");
    assert_eq!(mood_emoji("very_positive"), "😄");
}

#[test]
fn mood_emoji_unknown_is_neutral() {
    assert_eq!(mood_emoji("ecstatic"), "😐");
    assert_eq!(mood_emoji(""), "😐");
}
