//! # Post Recall CLI (`recall`)
//!
//! ```bash
//! recall --config ./config/recall.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recall rank "<query>"` | Rank past posts by relevance × recency |
//! | `recall smart "<topic>"` | Let the filter model pick related posts |
//! | `recall filter "<topic>"` | Cheap summary-only pick; prints paths |
//! | `recall hydrate <path>...` | Print full posts for paths |
//! | `recall status` | Show store health |
//!
//! ## Examples
//!
//! ```bash
//! # Ten most relevant posts about AI, full text, as JSON
//! recall rank "AI" --json
//!
//! # Body-less summaries of the five most recent posts
//! recall rank --summary --max 5
//!
//! # Write the retrieval prompt to a file for a manual model call
//! recall smart "AI memory" --prompt-only > /tmp/prompt.txt
//!
//! # Model-assisted recall, formatted for the writing model
//! recall smart "AI memory" "saw a thread on agent ethics"
//! ```

use clap::{Parser, Subcommand};
use post_recall::{config, hydrate, rank_cmd, smart, status};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Post Recall: relevance-ranked recall of past blog posts.
#[derive(Parser)]
#[command(
    name = "recall",
    about = "Post Recall: relevance-ranked recall of past blog posts for model-assisted drafting",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/recall.toml`. When the file does not exist
    /// built-in defaults are used.
    #[arg(long, global = true, default_value = "./config/recall.toml")]
    config: PathBuf,

    /// Post store directory; overrides `[store].root`.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank past posts by relevance to a query times recency.
    ///
    /// Without a query, posts are ranked by recency alone.
    Rank {
        /// Topic to match against bodies and tags.
        query: Option<String>,

        /// Maximum number of posts (default from `[ranking].max_results`).
        #[arg(long)]
        max: Option<String>,

        /// Return body-less summaries instead of full posts.
        #[arg(long)]
        summary: bool,

        /// Print structured JSON.
        #[arg(long)]
        json: bool,
    },

    /// Ask the filter model to pick the posts related to a topic.
    ///
    /// Falls back to the most recent posts when the model is unavailable
    /// or its reply cannot be read.
    Smart {
        /// Topic of the next post.
        topic: Option<String>,

        /// A new observation to include in the prompt.
        observation: Option<String>,

        /// Maximum number of posts (default from `[smart].max_results`).
        #[arg(long)]
        max: Option<String>,

        /// Only print the prompt; do not call the model.
        #[arg(long)]
        prompt_only: bool,

        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Pick related posts from one-line summaries and print their paths.
    Filter {
        /// Topic of the next post.
        topic: Option<String>,

        /// A new observation to include in the prompt.
        observation: Option<String>,

        /// Number of posts to pick (default from `[smart].max_results`).
        #[arg(long)]
        pick: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the full text of posts by path.
    Hydrate {
        /// Post files, e.g. from `recall filter` output.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print structured JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the post store location and counts.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "post_recall=debug"
    } else {
        "post_recall=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = config::load_or_default(&cli.config)?;
    if let Some(store) = cli.store {
        cfg.store.root = store;
    }

    match cli.command {
        Commands::Rank {
            query,
            max,
            summary,
            json,
        } => {
            let max_results = rank_cmd::parse_limit(max.as_deref(), cfg.ranking.max_results);
            rank_cmd::run_rank(&cfg, query.as_deref(), max_results, summary, json)?;
        }
        Commands::Smart {
            topic,
            observation,
            max,
            prompt_only,
            json,
        } => {
            let run = smart::RunOptions {
                topic: topic.as_deref(),
                observation: observation.as_deref(),
                max_results: rank_cmd::parse_limit(max.as_deref(), cfg.smart.max_results),
                json,
            };
            smart::run_smart(&cfg, &run, prompt_only).await?;
        }
        Commands::Filter {
            topic,
            observation,
            pick,
            json,
        } => {
            let run = smart::RunOptions {
                topic: topic.as_deref(),
                observation: observation.as_deref(),
                max_results: rank_cmd::parse_limit(pick.as_deref(), cfg.smart.max_results),
                json,
            };
            smart::run_filter(&cfg, &run).await?;
        }
        Commands::Hydrate { paths, json } => {
            hydrate::run_hydrate(&paths, json)?;
        }
        Commands::Status => {
            status::run_status(&cfg)?;
        }
    }

    Ok(())
}
