//! Tolerant frontmatter parser.
//!
//! A post starts with a header block fenced by `---` lines, followed by
//! the body:
//!
//! ```text
//! ---
//! time: 2026-02-07 09:30
//! tags: Observation, AI
//! mood: curious
//! ---
//! Body text...
//! ```
//!
//! Header lines are read as loose `key: value` pairs. Nothing is
//! validated against a schema: unknown keys are kept, malformed lines are
//! ignored, and each accessor falls back independently. The only hard
//! requirement is the fence itself plus a non-blank body; anything else
//! yields `None` so the loader can skip the file.
//!
//! # Example
//!
//! ```rust
//! use post_recall_core::frontmatter::parse;
//!
//! let post = parse("---\ntags: AI, Life\n---\nHello.\n").unwrap();
//! assert_eq!(post.header.tags(), vec!["AI", "Life"]);
//! assert_eq!(post.body, "Hello.");
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const FENCE: &str = "---";

/// Header fields in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: Vec<(String, String)>,
}

/// A successfully split post.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPost<'a> {
    pub header: Frontmatter,
    /// Body with surrounding whitespace trimmed. Never empty.
    pub body: &'a str,
}

/// Split `text` into header and body.
///
/// Returns `None` when the text does not open with a fence line, the
/// header is empty, there is no closing fence followed by a newline, or
/// the body is blank.
pub fn parse(text: &str) -> Option<ParsedPost<'_>> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content == FENCE {
            if offset == 0 || !line.ends_with('\n') {
                return None;
            }
            let body = rest[offset + line.len()..].trim();
            if body.is_empty() {
                return None;
            }
            return Some(ParsedPost {
                header: Frontmatter::from_block(&rest[..offset]),
                body,
            });
        }
        offset += line.len();
    }

    None
}

impl Frontmatter {
    fn from_block(block: &str) -> Self {
        let fields = block
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                let key = key.trim();
                let value = value.trim();
                if key.is_empty() || value.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        Self { fields }
    }

    /// First value for `key` (ASCII case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// All fields in file order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// The `time` field, if present and parseable.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.get("time").and_then(parse_timestamp)
    }

    /// The comma-separated `tags` field; empty when absent.
    pub fn tags(&self) -> Vec<String> {
        self.get("tags").map(split_tags).unwrap_or_default()
    }

    /// The opaque `mood` field.
    pub fn mood(&self) -> Option<&str> {
        self.get("mood")
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(raw);

    raw.split(',')
        .map(|t| unquote(t.trim()).to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner.trim();
        }
    }
    s
}

/// Parse a header timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` (space or `T`, with or
/// without an offset), and bare `YYYY-MM-DD`. Values without an offset
/// are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = unquote(raw.trim());

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%dT%H:%M%:z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_basic() {
        let text = "---\ntime: 2026-02-07 09:30\ntags: Observation, AI\nmood: curious\n---\n\nFirst post.\n";
        let post = parse(text).unwrap();
        assert_eq!(post.body, "First post.");
        assert_eq!(post.header.tags(), vec!["Observation", "AI"]);
        assert_eq!(post.header.mood(), Some("curious"));
        let t = post.header.time().unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2026, 2, 7));
        assert_eq!((t.hour(), t.minute()), (9, 30));
    }

    #[test]
    fn test_missing_opening_fence() {
        assert!(parse("time: 2026-01-01\n---\nbody").is_none());
        assert!(parse("Just some text").is_none());
    }

    #[test]
    fn test_missing_closing_fence() {
        assert!(parse("---\ntags: AI\nbody without fence\n").is_none());
    }

    #[test]
    fn test_closing_fence_at_eof() {
        assert!(parse("---\ntags: AI\n---").is_none());
    }

    #[test]
    fn test_empty_header_rejected() {
        assert!(parse("---\n---\nbody").is_none());
    }

    #[test]
    fn test_blank_body_rejected() {
        assert!(parse("---\ntags: AI\n---\n   \n\n").is_none());
    }

    #[test]
    fn test_crlf_line_endings() {
        let post = parse("---\r\ntags: AI\r\n---\r\nBody\r\n").unwrap();
        assert_eq!(post.body, "Body");
        assert_eq!(post.header.tags(), vec!["AI"]);
    }

    #[test]
    fn test_body_may_contain_fence() {
        let post = parse("---\ntags: AI\n---\nabove\n---\nbelow").unwrap();
        assert_eq!(post.body, "above\n---\nbelow");
    }

    #[test]
    fn test_malformed_lines_ignored() {
        let post = parse("---\nno colon here\n: novalue\ntags:\nmood: ok\n---\nBody").unwrap();
        assert!(post.header.tags().is_empty());
        assert_eq!(post.header.mood(), Some("ok"));
        assert_eq!(post.header.fields().len(), 1);
    }

    #[test]
    fn test_first_key_wins_case_insensitive() {
        let post = parse("---\nTags: A\ntags: B\n---\nBody").unwrap();
        assert_eq!(post.header.tags(), vec!["A"]);
    }

    #[test]
    fn test_tag_list_forms() {
        assert_eq!(split_tags("[AI, \"Life\"]"), vec!["AI", "Life"]);
        assert_eq!(split_tags("a,, b ,"), vec!["a", "b"]);
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2026-02-07T09:30:00Z").is_some());
        assert!(parse_timestamp("2026-02-07T09:30:00+08:00").is_some());
        assert!(parse_timestamp("2026-02-07 09:30:00").is_some());
        assert!(parse_timestamp("\"2026-02-07 09:30\"").is_some());
        assert!(parse_timestamp("2026-02-07").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_offset_is_normalized_to_utc() {
        let t = parse_timestamp("2026-02-07T08:00:00+08:00").unwrap();
        assert_eq!((t.day(), t.hour()), (7, 0));
    }

    #[test]
    fn test_unparseable_time_is_none() {
        let post = parse("---\ntime: soon\n---\nBody").unwrap();
        assert!(post.header.time().is_none());
    }
}
