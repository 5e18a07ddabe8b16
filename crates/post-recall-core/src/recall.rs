//! Outcomes of model-assisted recall.
//!
//! A filter model is asked to pick the posts most related to a topic.
//! Its reply is parsed into a [`RecallOutcome`]: either the model found
//! related posts ([`RecallOutcome::Relevant`]) or we hand back the most
//! recent posts instead ([`RecallOutcome::FallbackRecent`]), whether
//! because the model said nothing was related or because the call or its
//! reply failed. Callers match on the variant instead of checking a flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{days_ago, Document};
use crate::rank::{summarize, RankedDocument};

/// Relevance label used for posts returned only because they are recent.
pub const RECENT_ONLY: &str = "recent-only";

/// Errors from reading a model reply.
#[derive(Debug, Error)]
pub enum RecallError {
    #[error("no JSON object found in model reply")]
    NoJson,

    #[error("malformed model reply: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One post chosen for the downstream context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalledPost {
    /// Position in the list the post came from: the ranked candidates for
    /// a model pick, the newest-first corpus for [`fallback_recent`].
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "daysAgo")]
    pub days_ago: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form label such as `high` or [`RECENT_ONLY`].
    #[serde(default)]
    pub relevance: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, alias = "keyPoint")]
    pub key_point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

/// What recall produced, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecallOutcome {
    Relevant {
        items: Vec<RecalledPost>,
        reasoning: String,
    },
    FallbackRecent {
        items: Vec<RecalledPost>,
        reason: String,
    },
}

impl RecallOutcome {
    pub fn items(&self) -> &[RecalledPost] {
        match self {
            RecallOutcome::Relevant { items, .. } | RecallOutcome::FallbackRecent { items, .. } => {
                items
            }
        }
    }

    /// The model's reasoning or the fallback reason.
    pub fn explanation(&self) -> &str {
        match self {
            RecallOutcome::Relevant { reasoning, .. } => reasoning,
            RecallOutcome::FallbackRecent { reason, .. } => reason,
        }
    }
}

#[derive(Deserialize)]
struct RecallReply {
    #[serde(rename = "hasRelevant", alias = "has_relevant", default = "default_true")]
    has_relevant: bool,
    selected: Vec<RecalledPost>,
    #[serde(default)]
    reasoning: String,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct FilterReply {
    selected: Vec<i64>,
    #[serde(default)]
    reason: String,
}

/// Indices picked by the filter model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub indices: Vec<usize>,
    pub reason: String,
    /// True when the reply could not be parsed and the default order was used.
    pub fallback: bool,
}

/// Locate the JSON object in a model reply.
///
/// Prefers the first fenced ```` ```json ```` block; otherwise takes the
/// span from the first `{` to the last `}`.
pub fn extract_json(reply: &str) -> Option<&str> {
    if let Some(start) = reply.find("```json") {
        let rest = &reply[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            let inner = rest[..end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parse a recall reply against the candidates that were shown.
///
/// Items whose `index` points at a candidate get its location, and its
/// date when the model left that out.
pub fn parse_recall_reply(
    reply: &str,
    candidates: &[RankedDocument],
    now: DateTime<Utc>,
) -> Result<RecallOutcome, RecallError> {
    let json = extract_json(reply).ok_or(RecallError::NoJson)?;
    let parsed: RecallReply = serde_json::from_str(json)?;

    let items = parsed
        .selected
        .into_iter()
        .map(|mut item| {
            if let Some(candidate) = candidates.get(item.index) {
                let doc = &candidate.document;
                item.location = Some(doc.location.clone());
                if item.date.is_empty() {
                    item.date = doc.date();
                    item.days_ago = days_ago(doc.timestamp, now);
                }
            }
            item
        })
        .collect();

    Ok(if parsed.has_relevant {
        RecallOutcome::Relevant {
            items,
            reasoning: parsed.reasoning,
        }
    } else {
        RecallOutcome::FallbackRecent {
            items,
            reason: parsed.reasoning,
        }
    })
}

/// Parse a filter reply, keeping only in-range indices.
///
/// An unreadable reply selects the first three candidates.
pub fn parse_filter_reply(reply: &str, candidate_count: usize) -> FilterSelection {
    let parsed = extract_json(reply).and_then(|json| serde_json::from_str::<FilterReply>(json).ok());

    match parsed {
        Some(r) => FilterSelection {
            indices: r
                .selected
                .into_iter()
                .filter_map(|i| usize::try_from(i).ok())
                .filter(|i| *i < candidate_count)
                .collect(),
            reason: r.reason,
            fallback: false,
        },
        None => FilterSelection {
            indices: (0..candidate_count.min(3)).collect(),
            reason: "could not parse model output, using default order".to_string(),
            fallback: true,
        },
    }
}

/// The `max_results` most recent posts, labelled [`RECENT_ONLY`].
///
/// `corpus` must already be sorted newest first, as the loader returns it.
pub fn fallback_recent(
    corpus: &[Document],
    max_results: usize,
    reason: impl Into<String>,
    now: DateTime<Utc>,
    summary_chars: usize,
) -> RecallOutcome {
    let items = corpus
        .iter()
        .take(max_results)
        .enumerate()
        .map(|(index, doc)| RecalledPost {
            index,
            date: doc.date(),
            days_ago: days_ago(doc.timestamp, now),
            tags: doc.tags.clone(),
            relevance: RECENT_ONLY.to_string(),
            summary: summarize(&doc.body, summary_chars),
            key_point: "recent post".to_string(),
            location: Some(doc.location.clone()),
        })
        .collect();

    RecallOutcome::FallbackRecent {
        items,
        reason: reason.into(),
    }
}
