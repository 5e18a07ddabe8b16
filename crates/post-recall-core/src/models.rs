//! Core data models shared by the loader, the ranker, and the CLI.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A post loaded from the store.
///
/// Every `Document` produced by the loader has a body that is non-empty
/// after trimming; files without a parseable header never become one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Path of the post file; unique within the store.
    pub location: PathBuf,
    /// Authoring time from the `time` header, or the file mtime.
    pub timestamp: DateTime<Utc>,
    /// Tags in header order.
    pub tags: Vec<String>,
    /// Opaque `mood` header value, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Post text after the header, trimmed.
    pub body: String,
}

impl Document {
    /// Number of whitespace-separated words in the body.
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Calendar date of the post (`YYYY-MM-DD`, UTC).
    pub fn date(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Age of a timestamp in fractional days relative to `now`.
///
/// Negative for timestamps in the future.
pub fn age_in_days(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - timestamp).num_milliseconds() as f64 / 86_400_000.0
}

/// Whole days elapsed, rounded down.
pub fn days_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    age_in_days(timestamp, now).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_age_in_days() {
        let now = Utc::now();
        let age = age_in_days(now - Duration::hours(36), now);
        assert!((age - 1.5).abs() < 1e-9);
        assert_eq!(days_ago(now - Duration::hours(36), now), 1);
    }

    #[test]
    fn test_future_timestamp_is_negative() {
        let now = Utc::now();
        assert!(age_in_days(now + Duration::days(2), now) < 0.0);
    }

    #[test]
    fn test_word_count() {
        let doc = Document {
            location: PathBuf::from("a.md"),
            timestamp: Utc::now(),
            tags: vec![],
            mood: None,
            body: "one two\n\nthree".to_string(),
        };
        assert_eq!(doc.word_count(), 3);
    }
}
