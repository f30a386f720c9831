//! Trait seams between the FAQ core and its external collaborators.

pub mod provider;

pub use provider::{CompletionProvider, EmbeddingProvider};
