//! `recall rank`: local relevance × recency ranking.

use anyhow::Result;
use post_recall_core::rank::{rank, RankMode, RankRequest, Ranked};

use crate::config::Config;
use crate::corpus;

/// Width of the body excerpt in the human listing.
const EXCERPT_CHARS: usize = 80;

/// Parse a user-supplied result bound.
///
/// Missing, non-numeric, or non-positive values fall back to `default`
/// with a warning; they are never fatal.
pub fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => n as usize,
        _ => {
            tracing::warn!(value = raw, default, "invalid result limit, using default");
            default
        }
    }
}

pub fn run_rank(
    config: &Config,
    query: Option<&str>,
    max_results: usize,
    summary: bool,
    json: bool,
) -> Result<()> {
    let docs = corpus::load(&config.store)?;
    tracing::info!(posts = docs.len(), "loaded post store");

    let mode = if summary {
        RankMode::Summary
    } else {
        RankMode::Full
    };
    let req = RankRequest {
        params: config.ranking.params(),
        ..RankRequest::new(query, max_results, mode)
    };
    let ranked = rank(&docs, &req);

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No posts.");
        return Ok(());
    }

    println!("Recalled {} posts\n", ranked.len());

    let root = &config.store.root;
    match &ranked {
        Ranked::Full(items) => {
            for (i, r) in items.iter().enumerate() {
                let doc = &r.document;
                let excerpt: String = doc.body.chars().take(EXCERPT_CHARS).collect();
                println!(
                    "{}. [{} days ago] score={:.2} (relevance={:.2} × decay={:.2})",
                    i + 1,
                    r.age_days.floor() as i64,
                    r.final_score,
                    r.relevance,
                    r.recency_decay
                );
                println!("   Tags: {}", doc.tags.join(", "));
                println!("   Content: {}...", excerpt.replace('\n', " "));
                println!(
                    "   Path: {}\n",
                    doc.location.strip_prefix(root).unwrap_or(&doc.location).display()
                );
            }
        }
        Ranked::Summary(items) => {
            for (i, s) in items.iter().enumerate() {
                println!(
                    "{}. [{} days ago] score={:.2} (relevance={:.2} × decay={:.2}) {} chars",
                    i + 1,
                    s.days_ago,
                    s.final_score,
                    s.relevance,
                    s.recency_decay,
                    s.body_length
                );
                println!("   Tags: {}", s.tags.join(", "));
                println!("   Summary: {}", s.summary);
                println!(
                    "   Path: {}\n",
                    s.location.strip_prefix(root).unwrap_or(&s.location).display()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, 3), 3);
        assert_eq!(parse_limit(Some("5"), 3), 5);
        assert_eq!(parse_limit(Some(" 7 "), 3), 7);
        assert_eq!(parse_limit(Some("0"), 3), 3);
        assert_eq!(parse_limit(Some("-2"), 3), 3);
        assert_eq!(parse_limit(Some("lots"), 3), 3);
    }
}
