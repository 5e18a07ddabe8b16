use anyhow::Result;

use crate::config::Config;
use crate::corpus::{self, LoadError};

pub fn run_status(config: &Config) -> Result<()> {
    let root = &config.store.root;

    let report = match corpus::scan(&config.store) {
        Ok(r) => r,
        Err(LoadError::StoreNotFound(_)) => {
            println!("{:<12} {}", "store", root.display());
            println!("{:<12} MISSING", "status");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{:<12} {}", "store", root.display());
    println!("{:<12} OK", "status");
    println!("{:<12} {}", "posts", report.documents.len());
    println!("{:<12} {}", "skipped", report.skipped);

    if let Some(newest) = report.documents.first() {
        println!("{:<12} {}", "newest", newest.date());
    }
    if let Some(oldest) = report.documents.last() {
        println!("{:<12} {}", "oldest", oldest.date());
    }

    println!("{:<12} {}", "model", config.generator.model);

    Ok(())
}
