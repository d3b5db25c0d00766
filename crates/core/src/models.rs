//! # Models
//!
//! Completion provider configuration for tag generation. Every supported
//! provider speaks the OpenAI-compatible chat completion API, so a provider is
//! just a base URL, a default model, and the environment variable holding its
//! API key.

use serde::{Deserialize, Serialize};

/// Supported completion providers
///
/// - DeepSeek - `DEEPSEEK_API_KEY`
/// - OpenAI (GPT) - `OPENAI_API_KEY`
/// - OpenRouter (Gateway) - `OPENROUTER_API_KEY`
/// - Grok (xAI) - `XAI_API_KEY`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    DeepSeek,
    #[serde(rename = "openai")]
    OpenAI,
    OpenRouter,
    Grok,
}

impl LlmProvider {
    /// Get all available providers
    pub fn all() -> Vec<LlmProvider> {
        vec![
            LlmProvider::DeepSeek,
            LlmProvider::OpenAI,
            LlmProvider::OpenRouter,
            LlmProvider::Grok,
        ]
    }

    /// Parse a provider id as used in config files and the API
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deepseek" => Some(Self::DeepSeek),
            "openai" => Some(Self::OpenAI),
            "openrouter" => Some(Self::OpenRouter),
            "grok" => Some(Self::Grok),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "deepseek",
            LlmProvider::OpenAI => "openai",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::Grok => "grok",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "DeepSeek",
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::OpenRouter => "OpenRouter",
            LlmProvider::Grok => "Grok",
        }
    }

    /// Whether this provider supports custom base URL
    pub fn supports_base_url(&self) -> bool {
        matches!(self, LlmProvider::OpenAI)
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "https://api.deepseek.com",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::OpenRouter => "https://openrouter.ai/api/v1",
            LlmProvider::Grok => "https://api.x.ai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "deepseek-chat",
            LlmProvider::OpenAI => "gpt-4o-mini",
            LlmProvider::OpenRouter => "deepseek/deepseek-chat",
            LlmProvider::Grok => "grok-2",
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "DEEPSEEK_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            LlmProvider::Grok => "XAI_API_KEY",
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for the completion provider used by the generation gateway
///
/// ## Example
/// ```rust,ignore
/// use tierlist_core::models::{LlmProvider, ModelConfig};
///
/// // Default DeepSeek
/// let config = ModelConfig::default();
///
/// // OpenAI-compatible local endpoint
/// let config = ModelConfig::with_provider(LlmProvider::OpenAI, "qwen2.5")
///     .with_base_url("http://localhost:11434/v1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name (e.g., "deepseek-chat", "gpt-4o-mini")
    pub model: String,
    /// Optional base URL override for OpenAI-compatible APIs
    #[serde(default)]
    pub base_url: Option<String>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::with_provider(LlmProvider::DeepSeek, LlmProvider::DeepSeek.default_model())
    }
}

impl ModelConfig {
    /// Create a new model config with the default provider (DeepSeek)
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_provider(LlmProvider::DeepSeek, model)
    }

    /// Create config for a specific provider
    pub fn with_provider(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: None,
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set base URL (for OpenAI-compatible endpoints)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Chat completion endpoint. A base URL override only applies to
    /// providers that support one.
    pub fn endpoint(&self) -> String {
        let base = match &self.base_url {
            Some(url) if self.provider.supports_base_url() => url.as_str(),
            _ => self.provider.default_base_url(),
        };
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    /// Credential for a request: an explicit one wins, otherwise the
    /// provider's environment variable. Blank values count as missing.
    pub fn resolve_api_key(&self, credential: Option<&str>) -> Option<String> {
        credential
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| {
                std::env::var(self.provider.api_key_env())
                    .ok()
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty())
            })
    }
}
