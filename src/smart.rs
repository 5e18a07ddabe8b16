//! Model-assisted recall.
//!
//! Both flows rank locally first, then let a cheap filter model choose
//! from the top candidates:
//!
//! - [`smart_recall`] shows the model full post text and asks for a
//!   structured selection with summaries, yielding a [`RecallOutcome`].
//! - [`smart_filter`] shows only one-line summaries and asks for indices,
//!   which keeps the prompt to a few hundred tokens.
//!
//! Neither returns an error. A failed model call or an unreadable reply
//! falls back to the most recent posts and says why.

use anyhow::Result;
use chrono::{DateTime, Utc};
use post_recall_core::generator::TextGenerator;
use post_recall_core::models::Document;
use post_recall_core::prompt::{build_filter_prompt, build_recall_prompt, format_for_main_model};
use post_recall_core::rank::{
    rank_full, rank_summary, DocumentSummary, RankMode, RankParams, RankRequest, RankedDocument,
};
use post_recall_core::recall::{
    fallback_recent, parse_filter_reply, parse_recall_reply, FilterSelection, RecallOutcome,
};
use serde::Serialize;

use crate::config::Config;
use crate::corpus;
use crate::generator::CommandGenerator;

/// Inputs shared by both flows.
#[derive(Debug, Clone)]
pub struct SmartOptions<'a> {
    pub persona: &'a str,
    pub topic: Option<&'a str>,
    pub observation: Option<&'a str>,
    /// Posts to return.
    pub max_results: usize,
    /// Ranked candidates shown to the model.
    pub candidate_limit: usize,
    pub params: RankParams,
    pub now: DateTime<Utc>,
}

/// Result of [`smart_filter`].
#[derive(Debug, Clone, Serialize)]
pub struct FilterResult {
    pub selected: Vec<DocumentSummary>,
    pub reason: String,
}

/// The recall prompt for `corpus`, without calling a model.
pub fn recall_prompt(corpus: &[Document], opts: &SmartOptions<'_>) -> String {
    let candidates = recall_candidates(corpus, opts);
    build_recall_prompt(
        opts.persona,
        &candidates,
        opts.topic,
        opts.observation,
        opts.max_results,
        opts.now,
    )
}

fn recall_candidates(corpus: &[Document], opts: &SmartOptions<'_>) -> Vec<RankedDocument> {
    let req = RankRequest {
        query: opts.topic,
        max_results: opts.candidate_limit,
        mode: RankMode::Full,
        now: opts.now,
        params: opts.params.clone(),
    };
    rank_full(corpus, &req)
}

/// Rank, ask the model to pick related posts, and parse its reply.
pub async fn smart_recall(
    corpus: &[Document],
    generator: &dyn TextGenerator,
    opts: &SmartOptions<'_>,
) -> RecallOutcome {
    if corpus.is_empty() {
        return fallback_recent(
            corpus,
            opts.max_results,
            "no posts to choose from",
            opts.now,
            opts.params.summary_chars,
        );
    }

    let candidates = recall_candidates(corpus, opts);
    let prompt = build_recall_prompt(
        opts.persona,
        &candidates,
        opts.topic,
        opts.observation,
        opts.max_results,
        opts.now,
    );

    tracing::info!(
        model = generator.model_name(),
        candidates = candidates.len(),
        "asking filter model for related posts"
    );

    let fallback = |reason: String| {
        tracing::warn!(%reason, "falling back to recent posts");
        fallback_recent(
            corpus,
            opts.max_results,
            reason,
            opts.now,
            opts.params.summary_chars,
        )
    };

    let reply = match generator.generate(&prompt).await {
        Ok(r) => r,
        Err(e) => return fallback(format!("model call failed: {:#}", e)),
    };

    match parse_recall_reply(&reply, &candidates, opts.now) {
        // "Nothing related" without usable picks still returns recent posts.
        Ok(RecallOutcome::FallbackRecent { items, reason })
            if items.iter().all(|item| item.location.is_none()) =>
        {
            if reason.is_empty() {
                fallback("model found no related posts".to_string())
            } else {
                fallback(reason)
            }
        }
        Ok(outcome) => outcome,
        Err(e) => fallback(e.to_string()),
    }
}

/// Rank summaries by recency, ask the model for indices, return the picks.
pub async fn smart_filter(
    corpus: &[Document],
    generator: &dyn TextGenerator,
    opts: &SmartOptions<'_>,
) -> FilterResult {
    let req = RankRequest {
        query: None,
        max_results: opts.candidate_limit,
        mode: RankMode::Summary,
        now: opts.now,
        params: opts.params.clone(),
    };
    let candidates = rank_summary(corpus, &req);
    if candidates.is_empty() {
        return FilterResult {
            selected: Vec::new(),
            reason: "no posts to choose from".to_string(),
        };
    }

    let prompt = build_filter_prompt(
        opts.persona,
        &candidates,
        opts.topic,
        opts.observation,
        opts.max_results,
    );

    tracing::info!(
        model = generator.model_name(),
        candidates = candidates.len(),
        "filtering candidate summaries"
    );

    let selection = match generator.generate(&prompt).await {
        Ok(reply) => {
            let selection = parse_filter_reply(&reply, candidates.len());
            if selection.fallback {
                tracing::warn!("could not parse filter reply, using the first candidates");
            }
            selection
        }
        Err(e) => {
            let reason = format!("model call failed: {:#}", e);
            tracing::warn!(%reason, "using the first candidates");
            FilterSelection {
                indices: (0..candidates.len().min(3)).collect(),
                reason,
                fallback: true,
            }
        }
    };

    FilterResult {
        selected: selection
            .indices
            .iter()
            .map(|&i| candidates[i].clone())
            .collect(),
        reason: selection.reason,
    }
}

/// Options for a `smart` or `filter` run from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions<'a> {
    pub topic: Option<&'a str>,
    pub observation: Option<&'a str>,
    pub max_results: usize,
    pub json: bool,
}

fn smart_options<'a>(config: &'a Config, run: &RunOptions<'a>) -> SmartOptions<'a> {
    SmartOptions {
        persona: &config.persona.name,
        topic: run.topic,
        observation: run.observation,
        max_results: run.max_results,
        candidate_limit: config.smart.candidate_limit,
        params: config.ranking.params(),
        now: Utc::now(),
    }
}

/// CLI entry point for `recall smart`.
pub async fn run_smart(config: &Config, run: &RunOptions<'_>, prompt_only: bool) -> Result<()> {
    let docs = corpus::load(&config.store)?;
    tracing::info!(posts = docs.len(), "loaded post store");

    let opts = smart_options(config, run);

    if prompt_only {
        println!("{}", recall_prompt(&docs, &opts));
        return Ok(());
    }

    let generator = CommandGenerator::new(&config.generator);
    let outcome = smart_recall(&docs, &generator, &opts).await;

    if run.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", format_for_main_model(&outcome));
    }

    Ok(())
}

/// CLI entry point for `recall filter`.
pub async fn run_filter(config: &Config, run: &RunOptions<'_>) -> Result<()> {
    let docs = corpus::load(&config.store)?;
    let opts = smart_options(config, run);

    let generator = CommandGenerator::new(&config.generator);
    let result = smart_filter(&docs, &generator, &opts).await;

    if run.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Filter: {}\n", result.reason);
    for (i, s) in result.selected.iter().enumerate() {
        println!("{}. [{} days ago] {}", i + 1, s.days_ago, s.tags.join(", "));
        println!("   {}", s.summary);
        println!("   -> {}\n", s.location.display());
    }

    println!("---PATHS---");
    for s in &result.selected {
        println!("{}", s.location.display());
    }

    Ok(())
}
