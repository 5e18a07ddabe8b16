//! Prompt construction for model-assisted recall.
//!
//! Two prompts are built here. The recall prompt shows a filter model the
//! full text of the top candidates and asks for a structured selection
//! with summaries. The filter prompt is the token-frugal variant: one line
//! per candidate summary, asking only for indices.
//!
//! [`format_for_main_model`] renders a [`RecallOutcome`] as the Markdown
//! context block handed to the model that writes the next post.

use chrono::{DateTime, Utc};

use crate::models::days_ago;
use crate::rank::{DocumentSummary, RankedDocument};
use crate::recall::RecallOutcome;

const NO_TOPIC: &str = "no specific topic";

fn topic_lines(topic: Option<&str>, observation: Option<&str>) -> String {
    let mut out = format!("**Current topic:** {}\n", topic.unwrap_or(NO_TOPIC));
    if let Some(obs) = observation {
        out.push_str(&format!("**New observation:** {}\n", obs));
    }
    out
}

/// Build the full-text recall prompt.
pub fn build_recall_prompt(
    persona: &str,
    posts: &[RankedDocument],
    topic: Option<&str>,
    observation: Option<&str>,
    max_results: usize,
    now: DateTime<Utc>,
) -> String {
    let posts_text = posts
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let doc = &p.document;
            format!(
                "[{}] Published: {} ({} days ago)\nTags: {}\nMood: {}\nContent:\n{}\n\n---",
                i,
                doc.date(),
                days_ago(doc.timestamp, now),
                doc.tags.join(", "),
                doc.mood.as_deref().unwrap_or(""),
                doc.body
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are the memory retrieval assistant for {persona}.

**Task:** Find the past posts most related to the current topic or observation and write a precise summary of each.

{topic}
**Past posts:**
{posts_text}

**Selection rules:**
1. If some posts are clearly related (similar meaning, connected subject), select the {max_results} most related.
2. If none are clearly related, return the {max_results} most recent posts so unrelated content does not pollute the context.
3. Prefer recent posts (weight: 0-3 days > 4-7 days > older).

**Output format (JSON):**
```json
{{
  "hasRelevant": true,
  "selected": [
    {{
      "index": 0,
      "date": "2026-02-07",
      "daysAgo": 1,
      "tags": ["Observation", "AI"],
      "relevance": "high",
      "summary": "One or two precise sentences, highlighting the link to the current topic",
      "keyPoint": "The core point of this post"
    }}
  ],
  "reasoning": "Why these posts were chosen (or why recent posts were returned)"
}}
```

**Important:**
- Summaries must be precise and emphasize relevance.
- If nothing is related, set hasRelevant to false and return the {max_results} most recent posts.
- Do not force connections to unrelated content.

Output only the JSON, nothing else."#,
        persona = persona,
        topic = topic_lines(topic, observation),
        posts_text = posts_text,
        max_results = max_results,
    )
}

/// Build the summary-only filter prompt.
pub fn build_filter_prompt(
    persona: &str,
    candidates: &[DocumentSummary],
    topic: Option<&str>,
    observation: Option<&str>,
    pick: usize,
) -> String {
    let lines = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "[{}] {} days ago | {} | {}",
                i,
                c.days_ago,
                c.tags.join(", "),
                c.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are the memory retrieval assistant for {persona}.

**Task:** Pick the {pick} candidate posts most related to the current topic.

**Criteria:**
1. Most related to the current topic or observation
2. Prefer recent posts (recency is already reflected in the list order)
3. Avoid repeating the same subject

{topic}
**Candidates:**
{lines}

**Output format (JSON):**
```json
{{
  "selected": [0, 3, 7],
  "reason": "Short explanation of the choice"
}}
```

Output only the JSON, nothing else."#,
        persona = persona,
        pick = pick,
        topic = topic_lines(topic, observation),
        lines = lines,
    )
}

/// Render a recall outcome as context for the writing model.
pub fn format_for_main_model(outcome: &RecallOutcome) -> String {
    let status = match outcome {
        RecallOutcome::Relevant { .. } => "found related posts",
        RecallOutcome::FallbackRecent { .. } => "nothing clearly related, returning recent posts",
    };

    let mut out = String::from("## Past post recall\n\n");
    out.push_str(&format!("**Relevance:** {}\n", status));
    out.push_str(&format!("**Reasoning:** {}\n\n", outcome.explanation()));

    for (i, item) in outcome.items().iter().enumerate() {
        out.push_str(&format!("### {}. [{} days ago] {}\n", i + 1, item.days_ago, item.date));
        out.push_str(&format!("**Tags:** {}\n", item.tags.join(", ")));
        out.push_str(&format!("**Relevance:** {}\n", item.relevance));
        out.push_str(&format!("**Key point:** {}\n", item.key_point));
        out.push_str(&format!("**Summary:** {}\n\n", item.summary));
    }

    out
}
