//! Tagster error taxonomy.
//!
//! All errors are raised to the immediate caller with no local recovery;
//! the CLI owns logging and user-facing presentation. Upstream failures
//! keep their original cause attached for the logs.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TagsterError>;

#[derive(Debug, Error)]
pub enum TagsterError {
    /// FAQ source missing, unreadable, malformed, or empty.
    #[error("FAQ store unavailable: {0}")]
    StoreUnavailable(String),

    /// Similarity was asked to compare vectors of different lengths.
    #[error("embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A zero-magnitude vector reached the similarity engine.
    #[error("degenerate embedding vector (zero magnitude)")]
    DegenerateVector,

    /// Failure from the embedding or completion service.
    #[error("{service} request failed: {source}")]
    Upstream {
        service: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no API key configured for provider '{0}'")]
    ApiKeyMissing(String),

    #[error("unknown provider: {0}")]
    ProviderNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagsterError {
    /// Shorthand for an upstream failure with its cause attached.
    pub fn upstream(service: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Upstream {
            service: service.into(),
            source: source.into(),
        }
    }
}
