//! # Tagster Core
//!
//! Shared foundation for the Tagster FAQ assistant:
//! - configuration (`TagsterConfig`) — an explicit object passed to every
//!   component, no process-wide credential state
//! - error taxonomy (`TagsterError`)
//! - common types (`FaqEntry`, `Message`, `FaqAnswer`)
//! - provider traits (`EmbeddingProvider`, `CompletionProvider`)

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::TagsterConfig;
pub use error::{Result, TagsterError};
