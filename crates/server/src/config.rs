//! # Persisted Config
//!
//! Provider settings saved under the runtime directory (`.tierlist/` or
//! `TIERLIST_RUNTIME_PATH`). Ranking state itself is never persisted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tierlist_core::models::{LlmProvider, ModelConfig};
use utoipa::ToSchema;

/// Get the runtime directory path (.tierlist)
pub fn get_runtime_path() -> PathBuf {
    if let Ok(path) = std::env::var("TIERLIST_RUNTIME_PATH") {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".tierlist")
}

fn config_path() -> PathBuf {
    get_runtime_path().join("config.json")
}

/// Provider configuration exposed to the frontend. Every field is optional;
/// unset fields use the provider defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, ToSchema)]
pub struct PersistedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl PersistedConfig {
    pub async fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create runtime directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write config: {:?}", path))
    }

    /// Field-wise overwrite with whatever `other` sets
    pub fn merge(&mut self, other: PersistedConfig) {
        if other.provider.is_some() {
            self.provider = other.provider;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Resolve into a model config. An unknown provider id falls back to the
    /// default provider.
    pub fn to_model_config(&self) -> ModelConfig {
        let provider = match self.provider.as_deref() {
            Some(id) => LlmProvider::parse(id).unwrap_or_else(|| {
                tracing::warn!(provider = id, "Unknown provider, using default");
                LlmProvider::default()
            }),
            None => LlmProvider::default(),
        };

        let model = self
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());
        let mut config = ModelConfig::with_provider(provider, model);
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_runtime_path() {
        if std::env::var("TIERLIST_RUNTIME_PATH").is_err() {
            assert!(get_runtime_path().ends_with(".tierlist"));
        }
    }

    #[test]
    fn test_merge_overwrites_only_set_fields() {
        let mut config = PersistedConfig {
            provider: Some("deepseek".to_string()),
            model: Some("deepseek-chat".to_string()),
            ..Default::default()
        };
        config.merge(PersistedConfig {
            model: Some("deepseek-reasoner".to_string()),
            timeout_secs: Some(10),
            ..Default::default()
        });

        assert_eq!(config.provider.as_deref(), Some("deepseek"));
        assert_eq!(config.model.as_deref(), Some("deepseek-reasoner"));
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_to_model_config_defaults() {
        let config = PersistedConfig::default().to_model_config();
        assert_eq!(config, ModelConfig::default());

        let config = PersistedConfig {
            provider: Some("openai".to_string()),
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..Default::default()
        }
        .to_model_config();
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_unknown_provider_falls_back() {
        let config = PersistedConfig {
            provider: Some("nonsense".to_string()),
            ..Default::default()
        }
        .to_model_config();
        assert_eq!(config.provider, LlmProvider::DeepSeek);
    }

    #[test]
    fn test_serialization_skips_unset() {
        let json = serde_json::to_string(&PersistedConfig::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
