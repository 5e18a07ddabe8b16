//! Corpus loader: walk the post store and parse every post.
//!
//! Subdirectories carry no meaning (posts are usually filed as
//! `YYYY/MM/DD/slug.md`). A file is a candidate when it matches an
//! include glob and no exclude glob. Candidates without a valid header or
//! with a blank body are skipped, never reported as errors. So are
//! entries the walk cannot read (dangling symlinks, unreadable
//! directories). Only a missing or unreadable store root or a bad glob is
//! fatal.

use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use post_recall_core::frontmatter;
use post_recall_core::models::Document;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::StoreConfig;

/// Fatal corpus-loading failures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("post store does not exist: {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("failed to walk post store: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Loaded posts plus bookkeeping for `recall status`.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Newest first.
    pub documents: Vec<Document>,
    /// Entries that could not be walked, read, or parsed.
    pub skipped: usize,
}

/// Load every post in the store, newest first.
pub fn load(store: &StoreConfig) -> Result<Vec<Document>, LoadError> {
    scan(store).map(|report| report.documents)
}

/// Like [`load`], also counting skipped files.
pub fn scan(store: &StoreConfig) -> Result<LoadReport, LoadError> {
    let root = &store.root;
    if !root.is_dir() {
        return Err(LoadError::StoreNotFound(root.clone()));
    }

    let include_set = build_globset(&store.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(store.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&default_excludes)?;

    let mut report = LoadReport::default();

    for entry in WalkDir::new(root).follow_links(store.follow_symlinks) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!(
                    path = %e.path().unwrap_or(root.as_path()).display(),
                    error = %e,
                    "skipping unreadable store entry"
                );
                report.skipped += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy();

        if exclude_set.is_match(&*rel_str) || !include_set.is_match(&*rel_str) {
            continue;
        }

        match load_document(path) {
            Some(doc) => report.documents.push(doc),
            None => report.skipped += 1,
        }
    }

    sort_newest_first(&mut report.documents);

    tracing::debug!(
        root = %root.display(),
        loaded = report.documents.len(),
        skipped = report.skipped,
        "corpus loaded"
    );

    Ok(report)
}

/// Load a single post file.
///
/// Returns `None` (with a log line) when the file cannot be read or has
/// no valid header.
pub fn load_document(path: &Path) -> Option<Document> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable post");
            return None;
        }
    };

    let Some(parsed) = frontmatter::parse(&text) else {
        tracing::debug!(path = %path.display(), "skipping post without frontmatter");
        return None;
    };

    let timestamp = match parsed.header.time() {
        Some(t) => t,
        None => modified_time(path),
    };

    Some(Document {
        location: path.to_path_buf(),
        timestamp,
        tags: parsed.header.tags(),
        mood: parsed.header.mood().map(str::to_string),
        body: parsed.body.to_string(),
    })
}

/// Sort by timestamp (desc), then location (asc) for determinism.
pub fn sort_newest_first(docs: &mut [Document]) {
    docs.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.location.cmp(&b.location))
    });
}

fn modified_time(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, LoadError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
