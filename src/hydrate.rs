//! Re-read full posts for a previous summary listing.
//!
//! Summary-mode ranking withholds bodies to keep prompts small. Once a
//! caller has narrowed the list, [`hydrate`] loads the full text for just
//! those posts by location, without ranking again. Used by `recall hydrate`.

use anyhow::Result;
use post_recall_core::models::Document;
use post_recall_core::rank::DocumentSummary;
use std::path::{Path, PathBuf};

use crate::corpus;

/// Full documents for `summaries`, in the same order.
///
/// Posts that have since disappeared or lost their header are skipped.
pub fn hydrate(summaries: &[DocumentSummary]) -> Vec<Document> {
    hydrate_paths(summaries.iter().map(|s| s.location.as_path()))
}

/// Full documents for the given post paths, in order.
pub fn hydrate_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Vec<Document> {
    paths
        .into_iter()
        .filter_map(|path| {
            let doc = corpus::load_document(path);
            if doc.is_none() {
                tracing::warn!(path = %path.display(), "could not hydrate post");
            }
            doc
        })
        .collect()
}

/// CLI entry point: print each post in full.
pub fn run_hydrate(paths: &[PathBuf], json: bool) -> Result<()> {
    let docs = hydrate_paths(paths.iter().map(PathBuf::as_path));

    if json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }

    for doc in &docs {
        println!("--- Post ---");
        println!("location:  {}", doc.location.display());
        println!("time:      {}", doc.timestamp.format("%Y-%m-%dT%H:%M:%SZ"));
        println!("tags:      {}", doc.tags.join(", "));
        if let Some(ref mood) = doc.mood {
            println!("mood:      {}", mood);
        }
        println!("words:     {}", doc.word_count());
        println!();
        println!("{}", doc.body);
        println!();
    }

    if docs.len() < paths.len() {
        eprintln!("{} of {} posts could not be read.", paths.len() - docs.len(), paths.len());
    }

    Ok(())
}
