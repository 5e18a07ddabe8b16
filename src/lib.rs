//! # Post Recall
//!
//! **Relevance-ranked recall of past blog posts for model-assisted drafting.**
//!
//! Before the blog's persona writes a new post, Post Recall gathers the
//! past posts worth remembering: it loads the Markdown post store, scores
//! every post by lexical relevance to the topic times a recency decay,
//! and hands a bounded selection to whatever builds the next prompt.
//!
//! ## Data Flow
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ posts/**.md│──▶│ corpus::load │──▶│ core::rank  │──▶│ JSON / text  │
//! └────────────┘   └──────────────┘   └──────┬──────┘   └──────────────┘
//!                                            │
//!                                            ▼
//!                                   ┌──────────────────┐
//!                                   │ smart: prompt →  │
//!                                   │ TextGenerator →  │
//!                                   │ RecallOutcome    │
//!                                   └──────────────────┘
//! ```
//!
//! 1. [`corpus`] walks the store and parses frontmatter into
//!    [`Document`](post_recall_core::models::Document)s, newest first.
//! 2. [`post_recall_core::rank`] scores and selects the top K, either in
//!    full or as body-less summaries.
//! 3. [`smart`] optionally asks a filter model (through a
//!    [`TextGenerator`](post_recall_core::generator::TextGenerator)) to
//!    choose among the candidates, falling back to recent posts.
//! 4. [`hydrate`] re-reads full text for a summary listing on demand.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`corpus`] | Post store walker and loader |
//! | [`rank_cmd`] | `recall rank` output |
//! | [`smart`] | Model-assisted recall and filtering |
//! | [`generator`] | Chat-model CLI as a `TextGenerator` |
//! | [`hydrate`] | Full-text re-read by location |
//! | [`status`] | Store health summary |

pub mod config;
pub mod corpus;
pub mod generator;
pub mod hydrate;
pub mod rank_cmd;
pub mod smart;
pub mod status;

pub use corpus::LoadError;
