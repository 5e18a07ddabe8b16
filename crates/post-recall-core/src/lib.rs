//! # Post Recall Core
//!
//! Pure logic for Post Recall: the post model, tolerant frontmatter
//! parsing, relevance × recency ranking, prompt construction, model reply
//! parsing, and the [`generator::TextGenerator`] trait.
//!
//! This crate performs no filesystem I/O and spawns no processes. The
//! `post-recall` application crate loads posts from disk and supplies the
//! concrete generator.

pub mod frontmatter;
pub mod generator;
pub mod models;
pub mod prompt;
pub mod rank;
pub mod recall;
