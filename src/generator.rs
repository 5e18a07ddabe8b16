//! Chat-model CLI as a [`TextGenerator`].
//!
//! The prompt is written to a temporary file and the configured program
//! is spawned with `{model}` and `{prompt_file}` substituted into its
//! arguments. With the defaults this runs:
//!
//! ```text
//! openclaw chat --model gemini3-flash --file /tmp/.tmpXXXX
//! ```
//!
//! Stdout is the reply. A non-zero exit or an expired timeout is an error;
//! the child is killed when the timeout fires.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use post_recall_core::generator::TextGenerator;
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::GeneratorConfig;

pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    model: String,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn render_args(&self, prompt_file: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| {
                a.replace("{model}", &self.model)
                    .replace("{prompt_file}", prompt_file)
            })
            .collect()
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("recall-prompt-")
            .suffix(".txt")
            .tempfile()
            .context("Failed to create prompt file")?;
        file.write_all(prompt.as_bytes())
            .context("Failed to write prompt file")?;
        file.flush()?;

        let prompt_path = file.path().to_string_lossy().to_string();
        let args = self.render_args(&prompt_path);

        tracing::debug!(program = %self.program, ?args, "spawning generator");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to execute '{}'. Is it installed?", self.program))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.with_context(|| format!("'{}' did not complete", self.program))?,
            Err(_) => bail!(
                "'{}' timed out after {}s",
                self.program,
                self.timeout.as_secs()
            ),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} exited with {}: {}", self.program, output.status, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(program: &str, args: &[&str], timeout_secs: u64) -> GeneratorConfig {
        GeneratorConfig {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            model: "test-model".to_string(),
            timeout_secs,
        }
    }

    #[test]
    fn test_render_args() {
        let gen = CommandGenerator::new(&GeneratorConfig::default());
        assert_eq!(
            gen.render_args("/tmp/p.txt"),
            vec!["chat", "--model", "gemini3-flash", "--file", "/tmp/p.txt"]
        );
        assert_eq!(gen.model_name(), "gemini3-flash");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_reads_prompt_file() {
        let gen = CommandGenerator::new(&config("cat", &["{prompt_file}"], 10));
        let reply = gen.generate("hello prompt").await.unwrap();
        assert_eq!(reply, "hello prompt");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_error() {
        let gen = CommandGenerator::new(&config("sh", &["-c", "echo broken >&2; exit 3"], 10));
        let err = gen.generate("x").await.unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let gen = CommandGenerator::new(&config("sleep", &["5"], 1));
        let err = gen.generate("x").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let gen = CommandGenerator::new(&config("definitely-not-a-real-binary-xyz", &[], 5));
        assert!(gen.generate("x").await.is_err());
    }
}
