//! TOML configuration.
//!
//! Every section is optional; a missing config file means built-in
//! defaults (see [`load_or_default`]).
//!
//! ```toml
//! [store]
//! root = "./posts"
//! include_globs = ["**/*.md"]
//!
//! [ranking]
//! max_results = 10
//! keyword_weight = 0.2
//!
//! [generator]
//! program = "openclaw"
//! model = "gemini3-flash"
//! ```

use anyhow::{Context, Result};
use post_recall_core::rank::RankParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub smart: SmartConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./posts")
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,
    #[serde(default = "default_tag_bonus")]
    pub tag_bonus: f64,
    #[serde(default = "default_neutral_relevance")]
    pub neutral_relevance: f64,
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            keyword_weight: default_keyword_weight(),
            tag_bonus: default_tag_bonus(),
            neutral_relevance: default_neutral_relevance(),
            summary_chars: default_summary_chars(),
        }
    }
}

fn default_max_results() -> usize {
    10
}
fn default_keyword_weight() -> f64 {
    0.2
}
fn default_tag_bonus() -> f64 {
    0.5
}
fn default_neutral_relevance() -> f64 {
    0.5
}
fn default_summary_chars() -> usize {
    100
}

impl RankingConfig {
    pub fn params(&self) -> RankParams {
        RankParams {
            keyword_weight: self.keyword_weight,
            tag_bonus: self.tag_bonus,
            neutral_relevance: self.neutral_relevance,
            summary_chars: self.summary_chars,
            default_max_results: self.max_results,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmartConfig {
    /// Posts returned by `smart` and picked by `filter`.
    #[serde(default = "default_smart_max_results")]
    pub max_results: usize,
    /// Ranked candidates shown to the filter model.
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
}

impl Default for SmartConfig {
    fn default() -> Self {
        Self {
            max_results: default_smart_max_results(),
            candidate_limit: default_candidate_limit(),
        }
    }
}

fn default_smart_max_results() -> usize {
    3
}
fn default_candidate_limit() -> usize {
    15
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments; `{model}` and `{prompt_file}` are substituted.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_program() -> String {
    "openclaw".to_string()
}
fn default_args() -> Vec<String> {
    ["chat", "--model", "{model}", "--file", "{prompt_file}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_model() -> String {
    "gemini3-flash".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersonaConfig {
    #[serde(default = "default_persona")]
    pub name: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona(),
        }
    }
}

fn default_persona() -> String {
    "Adam".to_string()
}

/// Read, parse, and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    let ranking = &config.ranking;
    if ranking.max_results == 0 {
        anyhow::bail!("ranking.max_results must be >= 1");
    }
    if ranking.summary_chars == 0 {
        anyhow::bail!("ranking.summary_chars must be > 0");
    }
    for (name, value) in [
        ("keyword_weight", ranking.keyword_weight),
        ("tag_bonus", ranking.tag_bonus),
        ("neutral_relevance", ranking.neutral_relevance),
    ] {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("ranking.{} must be in [0.0, 1.0]", name);
        }
    }

    if config.smart.max_results == 0 {
        anyhow::bail!("smart.max_results must be >= 1");
    }
    if config.smart.candidate_limit == 0 {
        anyhow::bail!("smart.candidate_limit must be >= 1");
    }

    if config.generator.program.trim().is_empty() {
        anyhow::bail!("generator.program must not be empty");
    }
    if config.generator.timeout_secs == 0 {
        anyhow::bail!("generator.timeout_secs must be > 0");
    }

    if config.store.include_globs.is_empty() {
        anyhow::bail!("store.include_globs must list at least one pattern");
    }

    Ok(())
}
