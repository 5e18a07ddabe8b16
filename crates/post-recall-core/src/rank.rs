//! Relevance × recency ranking over a loaded corpus.
//!
//! Ranking is pure: it takes the corpus, a [`RankRequest`], and returns
//! either full documents or token-bounded summaries. Nothing is cached
//! between calls.
//!
//! # Scoring
//!
//! 1. `age_days = now − timestamp` (fractional days).
//! 2. `recency_decay` is a step function of age: `≤3 → 1.0`, `≤7 → 0.7`,
//!    `≤14 → 0.5`, `≤30 → 0.3`, else `0.1`. Future posts count as fresh.
//! 3. `relevance`: with no query, a flat `neutral_relevance`. Otherwise
//!    `keyword_weight × occurrences` of the query in the searchable text
//!    plus one `tag_bonus` when any tag and the query contain each other,
//!    clamped to `1.0`.
//! 4. `final_score = relevance × recency_decay`.
//! 5. Stable sort by `final_score` (desc), so ties keep corpus order,
//!    then truncate to `max_results`.
//!
//! In [`RankMode::Full`] the searchable text is the whole body. In
//! [`RankMode::Summary`] it is the truncated summary, matching what the
//! downstream model will actually see.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::models::{age_in_days, Document};

/// Marker appended to summaries cut at the character budget.
pub const ELLIPSIS: &str = "...";

/// Output shape of a ranking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Top-K documents with their full bodies.
    #[default]
    Full,
    /// Top-K summaries; bodies are withheld.
    Summary,
}

/// Scoring constants, decoupled from application config.
#[derive(Debug, Clone, PartialEq)]
pub struct RankParams {
    /// Relevance contributed by each query occurrence.
    pub keyword_weight: f64,
    /// Flat bonus when a tag matches the query.
    pub tag_bonus: f64,
    /// Relevance assigned to every document when there is no query.
    pub neutral_relevance: f64,
    /// Character budget for summaries.
    pub summary_chars: usize,
    /// Used when a request asks for zero results.
    pub default_max_results: usize,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            keyword_weight: 0.2,
            tag_bonus: 0.5,
            neutral_relevance: 0.5,
            summary_chars: 100,
            default_max_results: 10,
        }
    }
}

/// Bundles all inputs for a single ranking call.
#[derive(Debug, Clone)]
pub struct RankRequest<'a> {
    /// Topic to match; `None` or blank ranks by recency alone.
    pub query: Option<&'a str>,
    /// Upper bound on results; `0` means `params.default_max_results`.
    pub max_results: usize,
    pub mode: RankMode,
    /// Reference time for age computation.
    pub now: DateTime<Utc>,
    pub params: RankParams,
}

impl<'a> RankRequest<'a> {
    /// A request with default params, ranked against the current time.
    pub fn new(query: Option<&'a str>, max_results: usize, mode: RankMode) -> Self {
        Self {
            query,
            max_results,
            mode,
            now: Utc::now(),
            params: RankParams::default(),
        }
    }
}

/// A document with its full body and score breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct RankedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub age_days: f64,
    pub recency_decay: f64,
    pub relevance: f64,
    pub final_score: f64,
}

/// A body-less view of a ranked document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub location: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub age_days: f64,
    pub days_ago: i64,
    pub tags: Vec<String>,
    pub summary: String,
    /// Character count of the untruncated body.
    pub body_length: usize,
    pub recency_decay: f64,
    pub relevance: f64,
    pub final_score: f64,
}

/// Result of [`rank`], shaped by [`RankMode`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", content = "items", rename_all = "snake_case")]
pub enum Ranked {
    Full(Vec<RankedDocument>),
    Summary(Vec<DocumentSummary>),
}

impl Ranked {
    pub fn len(&self) -> usize {
        match self {
            Ranked::Full(items) => items.len(),
            Ranked::Summary(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct ScoredCandidate<'a> {
    document: &'a Document,
    age_days: f64,
    recency_decay: f64,
    relevance: f64,
    final_score: f64,
    summary: Option<String>,
}

/// Rank `corpus` and return the top results in the requested shape.
pub fn rank(corpus: &[Document], req: &RankRequest<'_>) -> Ranked {
    let query = req.query.map(str::trim).filter(|q| !q.is_empty());
    let limit = if req.max_results == 0 {
        req.params.default_max_results
    } else {
        req.max_results
    };

    let mut scored: Vec<ScoredCandidate<'_>> = corpus
        .iter()
        .map(|doc| {
            let age_days = age_in_days(doc.timestamp, req.now);
            let recency_decay = recency_decay(age_days);
            let (relevance, summary) = match req.mode {
                RankMode::Full => (relevance(query, &doc.body, &doc.tags, &req.params), None),
                RankMode::Summary => {
                    let prefix = one_line_prefix(&doc.body, req.params.summary_chars);
                    let relevance = relevance(query, &prefix, &doc.tags, &req.params);
                    (relevance, Some(with_ellipsis(prefix, &doc.body, req.params.summary_chars)))
                }
            };
            ScoredCandidate {
                document: doc,
                age_days,
                recency_decay,
                relevance,
                final_score: relevance * recency_decay,
                summary,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);

    match req.mode {
        RankMode::Full => Ranked::Full(
            scored
                .into_iter()
                .map(|c| RankedDocument {
                    document: c.document.clone(),
                    age_days: c.age_days,
                    recency_decay: c.recency_decay,
                    relevance: c.relevance,
                    final_score: c.final_score,
                })
                .collect(),
        ),
        RankMode::Summary => Ranked::Summary(
            scored
                .into_iter()
                .map(|c| DocumentSummary {
                    location: c.document.location.clone(),
                    timestamp: c.document.timestamp,
                    age_days: c.age_days,
                    days_ago: c.age_days.floor() as i64,
                    tags: c.document.tags.clone(),
                    summary: c
                        .summary
                        .unwrap_or_else(|| summarize(&c.document.body, req.params.summary_chars)),
                    body_length: c.document.body.chars().count(),
                    recency_decay: c.recency_decay,
                    relevance: c.relevance,
                    final_score: c.final_score,
                })
                .collect(),
        ),
    }
}

/// Full-mode ranking; convenience over [`rank`].
pub fn rank_full(corpus: &[Document], req: &RankRequest<'_>) -> Vec<RankedDocument> {
    let req = RankRequest {
        mode: RankMode::Full,
        ..req.clone()
    };
    match rank(corpus, &req) {
        Ranked::Full(items) => items,
        Ranked::Summary(_) => Vec::new(),
    }
}

/// Summary-mode ranking; convenience over [`rank`].
pub fn rank_summary(corpus: &[Document], req: &RankRequest<'_>) -> Vec<DocumentSummary> {
    let req = RankRequest {
        mode: RankMode::Summary,
        ..req.clone()
    };
    match rank(corpus, &req) {
        Ranked::Summary(items) => items,
        Ranked::Full(_) => Vec::new(),
    }
}

/// Step-function recency multiplier.
///
/// The breakpoints are part of the ranking contract; do not smooth them.
pub fn recency_decay(age_days: f64) -> f64 {
    if age_days <= 3.0 {
        1.0
    } else if age_days <= 7.0 {
        0.7
    } else if age_days <= 14.0 {
        0.5
    } else if age_days <= 30.0 {
        0.3
    } else {
        0.1
    }
}

/// Lexical relevance of `text` and `tags` to `query`, in `[0.0, 1.0]`.
///
/// `query` must already be trimmed; `None` yields `neutral_relevance`.
pub fn relevance(query: Option<&str>, text: &str, tags: &[String], params: &RankParams) -> f64 {
    let Some(query) = query else {
        return params.neutral_relevance;
    };

    let query = query.to_lowercase();
    let occurrences = text.to_lowercase().matches(query.as_str()).count();
    let mut score = occurrences as f64 * params.keyword_weight;

    let tag_match = tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        tag.contains(query.as_str()) || query.contains(tag.as_str())
    });
    if tag_match {
        score += params.tag_bonus;
    }

    score.min(1.0)
}

/// First `budget` characters of `body` on one line.
///
/// `\n` becomes a space and `\r` is dropped. [`ELLIPSIS`] is appended
/// only when the body is longer than the budget.
pub fn summarize(body: &str, budget: usize) -> String {
    with_ellipsis(one_line_prefix(body, budget), body, budget)
}

fn one_line_prefix(body: &str, budget: usize) -> String {
    body.chars()
        .take(budget)
        .filter(|c| *c != '\r')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

fn with_ellipsis(mut prefix: String, body: &str, budget: usize) -> String {
    if body.chars().nth(budget).is_some() {
        prefix.push_str(ELLIPSIS);
    }
    prefix
}
