//! Provider traits — the embedding and completion service boundaries.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EmbeddingVector, Message};

/// Produces a fixed-length semantic vector for a text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider identifier, for logs and error messages.
    fn name(&self) -> &str;

    /// Embed a single text. One call per text — batching is out of scope.
    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;
}

/// Generates free-text completions from a chat-style prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider identifier, for logs and error messages.
    fn name(&self) -> &str;

    /// Send the messages and return the first generated response text.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
