//! Text generation trait.
//!
//! Defines the [`TextGenerator`] port that model-assisted recall calls to
//! pick posts. The core never talks to a model directly; concrete
//! implementations (a chat-model CLI spawned as a child process, canned
//! replies in tests) live in the `post-recall` app crate.

use anyhow::Result;
use async_trait::async_trait;

/// A model that turns a prompt into a text reply.
///
/// # Example
///
/// ```rust
/// use anyhow::Result;
/// use async_trait::async_trait;
/// use post_recall_core::generator::TextGenerator;
///
/// pub struct Canned(String);
///
/// #[async_trait]
/// impl TextGenerator for Canned {
///     fn model_name(&self) -> &str { "canned" }
///     async fn generate(&self, _prompt: &str) -> Result<String> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model identifier (e.g. `"gemini3-flash"`).
    fn model_name(&self) -> &str;

    /// Send `prompt` to the model and return its raw reply.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
