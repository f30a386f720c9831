//! Tagster configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsterConfig {
    /// Shared fallback API key, used when no provider-specific key is found.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub faq: FaqConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for TagsterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            faq: FaqConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl TagsterConfig {
    /// Load config from the default path (~/.tagster/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::TagsterError::Config(format!("Failed to read config: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::TagsterError::Config(format!("Failed to parse config: {e}"))
        })?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Tagster home directory (~/.tagster).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tagster")
    }
}

/// Completion (fallback responder) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Endpoint override; empty means the provider registry default.
    #[serde(default)]
    pub endpoint: String,
}

fn default_provider() -> String { "openai".into() }
fn default_llm_model() -> String { "gpt-4o-mini".into() }
fn default_temperature() -> f32 { 0.7 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_llm_model(),
            temperature: default_temperature(),
            endpoint: String::new(),
        }
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Endpoint override; empty means the provider registry default.
    #[serde(default)]
    pub endpoint: String,
}

fn default_embedding_model() -> String { "text-embedding-3-small".into() }

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_embedding_model(),
            endpoint: String::new(),
        }
    }
}

/// FAQ store and matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqConfig {
    #[serde(default = "default_faq_path")]
    pub path: String,
    /// Minimum cosine similarity for a stored answer; strictly above wins.
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f32,
}

fn default_faq_path() -> String { "data/faq.json".into() }
fn default_threshold() -> f32 { 0.7 }

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            path: default_faq_path(),
            similarity_threshold: default_threshold(),
        }
    }
}

/// Upstream retry and timeout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_attempts() -> u32 { 3 }
fn default_backoff_ms() -> u64 { 250 }
fn default_timeout_secs() -> u64 { 30 }

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_backoff_ms(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}
