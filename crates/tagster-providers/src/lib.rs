//! # Tagster Providers
//!
//! Embedding and completion clients for the FAQ core.
//!
//! All supported services speak the OpenAI wire format and are handled by a
//! single `OpenAiCompatibleProvider`; providers differ only in endpoint URL,
//! auth style, and API key.

pub mod openai_compatible;
pub mod provider_registry;
pub mod retry;

use std::sync::Arc;

use tagster_core::TagsterConfig;
use tagster_core::error::{Result, TagsterError};
use tagster_core::traits::provider::{CompletionProvider, EmbeddingProvider};

use openai_compatible::OpenAiCompatibleProvider;

/// Create the embedding provider from configuration.
pub fn create_embedder(config: &TagsterConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider = build(&config.embedding.provider, &config.embedding.endpoint, config)?;
    Ok(Arc::new(provider))
}

/// Create the completion (fallback responder) provider from configuration.
pub fn create_completer(config: &TagsterConfig) -> Result<Arc<dyn CompletionProvider>> {
    let provider = build(&config.llm.provider, &config.llm.endpoint, config)?;
    Ok(Arc::new(provider))
}

/// List all available provider names.
pub fn available_providers() -> Vec<&'static str> {
    let mut names = provider_registry::all_provider_names();
    names.push("custom");
    names
}

fn build(
    provider_name: &str,
    endpoint_override: &str,
    config: &TagsterConfig,
) -> Result<OpenAiCompatibleProvider> {
    // Custom endpoint: "custom:https://my-server.com/v1"
    if provider_name.starts_with("custom:") {
        return OpenAiCompatibleProvider::custom(provider_name, config);
    }

    let registry = provider_registry::get_provider_config(provider_name)
        .ok_or_else(|| TagsterError::ProviderNotFound(provider_name.into()))?;
    OpenAiCompatibleProvider::from_registry(registry, config, endpoint_override)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_providers_resolve() {
        let config = TagsterConfig::default();
        assert!(build("openai", "", &config).is_ok());
        assert!(build("ollama", "", &config).is_ok());
        assert!(build("custom:http://localhost:8080/v1", "", &config).is_ok());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = TagsterConfig::default();
        let err = build("does-not-exist", "", &config).unwrap_err();
        assert!(matches!(err, TagsterError::ProviderNotFound(_)));
    }
}
