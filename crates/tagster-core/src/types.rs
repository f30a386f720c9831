//! Shared data types.

use serde::{Deserialize, Serialize};

/// A single canonical question/answer pair from the FAQ source.
///
/// Immutable after load; collection order is the FAQ file's key order and
/// decides tie-breaks and fallback-context layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Semantic embedding of a text, as returned by an embedding provider.
/// Transient — held for the duration of a query or in the in-process cache,
/// never persisted.
pub type EmbeddingVector = Vec<f32>;

/// Chat message roles understood by completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message sent to a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Which path produced an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerSource {
    /// Stored answer for the named FAQ question, matched at `score`.
    Faq { question: String, score: f32 },
    /// Generated by the fallback completion service.
    Generated,
}

/// An answer plus its provenance.
#[derive(Debug, Clone)]
pub struct FaqAnswer {
    pub text: String,
    pub source: AnswerSource,
}
