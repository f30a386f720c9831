//! Unified OpenAI-compatible provider.
//!
//! A single struct that speaks both the `/embeddings` and
//! `/chat/completions` sides of the OpenAI wire format. Different providers
//! are distinguished only by endpoint URL, auth style, and API key.

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Value, json};

use tagster_core::config::{RetryConfig, TagsterConfig};
use tagster_core::error::{Result, TagsterError};
use tagster_core::traits::provider::{CompletionProvider, EmbeddingProvider};
use tagster_core::types::{EmbeddingVector, Message};

use crate::provider_registry::{AuthStyle, ProviderConfig};
use crate::retry::{AttemptError, with_retries};

/// A unified provider that works with any OpenAI-compatible API.
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    /// Provider name (e.g., "openai", "ollama").
    name: String,
    /// API key for authentication.
    api_key: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    base_url: String,
    /// Path for chat completions (e.g., "/chat/completions").
    chat_path: String,
    /// Path for embeddings (e.g., "/embeddings").
    embeddings_path: String,
    /// Authentication style.
    auth_style: AuthStyle,
    /// Model used for chat completions.
    chat_model: String,
    /// Model used for embeddings.
    embedding_model: String,
    /// Sampling temperature for completions.
    temperature: f32,
    /// Retry policy for upstream requests.
    retry: RetryConfig,
    /// HTTP client (carries the per-request timeout).
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create from a known provider config + TagsterConfig.
    ///
    /// Resolution order:
    /// - API key: `config.api_key` > env vars > empty
    /// - Base URL: `endpoint_override` > env override > registry default
    pub fn from_registry(
        registry: &ProviderConfig,
        config: &TagsterConfig,
        endpoint_override: &str,
    ) -> Result<Self> {
        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .unwrap_or_default()
        };

        let base_url = if !endpoint_override.is_empty() {
            endpoint_override.trim_end_matches('/').to_string()
        } else {
            registry
                .base_url_env
                .and_then(|env_key| {
                    let val = std::env::var(env_key).ok()?;
                    // For OLLAMA_HOST-style overrides, append /v1 if not present
                    if val.ends_with("/v1") {
                        Some(val)
                    } else {
                        Some(format!("{}/v1", val.trim_end_matches('/')))
                    }
                })
                .unwrap_or_else(|| registry.base_url.to_string())
        };

        Self::build(
            registry.name.to_string(),
            api_key,
            base_url,
            registry.chat_path.to_string(),
            registry.embeddings_path.to_string(),
            registry.auth_style,
            config,
        )
    }

    /// Create for a custom endpoint (e.g., "custom:https://my-server.com/v1").
    pub fn custom(endpoint: &str, config: &TagsterConfig) -> Result<Self> {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();

        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Self::build(
            "custom".to_string(),
            api_key,
            base_url,
            "/chat/completions".to_string(),
            "/embeddings".to_string(),
            auth_style,
            config,
        )
    }

    fn build(
        name: String,
        api_key: String,
        base_url: String,
        chat_path: String,
        embeddings_path: String,
        auth_style: AuthStyle,
        config: &TagsterConfig,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.retry.request_timeout_secs))
            .build()
            .map_err(|e| TagsterError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            name,
            api_key,
            base_url,
            chat_path,
            embeddings_path,
            auth_style,
            chat_model: config.llm.model.clone(),
            embedding_model: config.embedding.model.clone(),
            temperature: config.llm.temperature,
            retry: config.retry.clone(),
            client,
        })
    }

    /// Build the auth header for the request.
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }

    fn require_api_key(&self) -> Result<()> {
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(TagsterError::ApiKeyMissing(self.name.clone()));
        }
        Ok(())
    }

    /// POST `body` to `path` with bounded retries, returning the parsed JSON.
    async fn post_json(&self, service: &str, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        with_retries(service, &self.retry, || {
            let req = self
                .apply_auth(self.client.post(&url).header("Content-Type", "application/json"))
                .json(body);
            let url = url.clone();
            let service = service.to_string();
            async move { execute(req, &url, &service).await }
        })
        .await
    }
}

/// One request/response cycle, with the failure classified for retry.
async fn execute(
    req: reqwest::RequestBuilder,
    url: &str,
    service: &str,
) -> std::result::Result<Value, AttemptError> {
    let resp = req
        .send()
        .await
        .map_err(|e| AttemptError::retryable(anyhow!("connection failed ({url}): {e}")))?;

    let status = resp.status();
    if status.as_u16() == 429 || status.is_server_error() {
        let text = resp.text().await.unwrap_or_default();
        return Err(AttemptError::retryable(anyhow!("HTTP {status}: {text}")));
    }
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(AttemptError::Fatal(TagsterError::upstream(
            service,
            anyhow!("HTTP {status}: {text}"),
        )));
    }

    resp.json::<Value>()
        .await
        .map_err(|e| AttemptError::Fatal(TagsterError::upstream(service, e)))
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        self.require_api_key()?;

        let service = format!("{} embeddings", self.name);
        let body = json!({
            "model": self.embedding_model,
            "input": text,
        });

        let response = self.post_json(&service, &self.embeddings_path, &body).await?;

        let values = response["data"][0]["embedding"].as_array().ok_or_else(|| {
            TagsterError::upstream(&service, anyhow!("no embedding in response"))
        })?;
        let mut vector = Vec::with_capacity(values.len());
        for value in values {
            let component = value.as_f64().ok_or_else(|| {
                TagsterError::upstream(&service, anyhow!("non-numeric embedding component"))
            })?;
            vector.push(component as f32);
        }

        tracing::trace!("embedded {} chars into {} dims", text.len(), vector.len());
        Ok(vector)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.require_api_key()?;

        let service = format!("{} chat", self.name);
        let body = json!({
            "model": self.chat_model,
            "temperature": self.temperature,
            "messages": messages,
        });

        let response = self.post_json(&service, &self.chat_path, &body).await?;

        let content = response["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| {
                TagsterError::upstream(&service, anyhow!("no completion choices in response"))
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider_registry::get_provider_config;

    fn provider_with_key(api_key: &str) -> OpenAiCompatibleProvider {
        let config = TagsterConfig {
            api_key: api_key.to_string(),
            ..TagsterConfig::default()
        };
        let registry = get_provider_config("openai").unwrap();
        OpenAiCompatibleProvider::from_registry(registry, &config, "").unwrap()
    }

    #[test]
    fn test_config_key_wins() {
        let provider = provider_with_key("sk-from-config");
        assert_eq!(provider.api_key, "sk-from-config");
        assert_eq!(provider.base_url, "https://api.openai.com/v1");
        assert_eq!(provider.chat_model, "gpt-4o-mini");
        assert_eq!(provider.embedding_model, "text-embedding-3-small");
    }

    #[test]
    fn test_endpoint_override() {
        let config = TagsterConfig::default();
        let registry = get_provider_config("openai").unwrap();
        let provider =
            OpenAiCompatibleProvider::from_registry(registry, &config, "http://proxy:9000/v1/")
                .unwrap();
        assert_eq!(provider.base_url, "http://proxy:9000/v1");
    }

    #[test]
    fn test_custom_endpoint_parsing() {
        let config = TagsterConfig::default();
        let provider =
            OpenAiCompatibleProvider::custom("custom:https://my-server.com/v1/", &config).unwrap();
        assert_eq!(provider.name, "custom");
        assert_eq!(provider.base_url, "https://my-server.com/v1");
        // No key anywhere means no auth header for custom endpoints
        assert_eq!(provider.auth_style, AuthStyle::None);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let provider = provider_with_key("");
        if !provider.api_key.is_empty() {
            // OPENAI_API_KEY leaked in from the environment; nothing to test
            return;
        }

        let err = EmbeddingProvider::embed(&provider, "hello").await.unwrap_err();
        assert!(matches!(err, TagsterError::ApiKeyMissing(ref name) if name == "openai"));

        let err = provider.complete(&[Message::user("hello")]).await.unwrap_err();
        assert!(matches!(err, TagsterError::ApiKeyMissing(_)));
    }
}
