//! # Completion Provider
//!
//! The text-generation collaborator behind the gateway. The gateway only
//! needs "system + user instruction in, free text out", so that is the whole
//! trait; `ChatCompletionClient` implements it against any OpenAI-compatible
//! chat completion endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{TierError, TierResult};
use crate::models::ModelConfig;

/// Anything that can turn a pair of instructions into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one completion. `credential` overrides any configured API key.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        credential: Option<&str>,
    ) -> TierResult<String>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completion client
pub struct ChatCompletionClient {
    config: ModelConfig,
    http: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new(config: ModelConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("tierlist/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        credential: Option<&str>,
    ) -> TierResult<String> {
        let api_key = self.config.resolve_api_key(credential).ok_or_else(|| {
            TierError::Provider(format!(
                "no API key (set {} or pass a credential)",
                self.config.provider.api_key_env()
            ))
        })?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TierError::Provider(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    TierError::Provider(format!("credential rejected ({})", status))
                }
                _ => TierError::Provider(format!(
                    "{} - {}",
                    status,
                    detail.chars().take(200).collect::<String>()
                )),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| TierError::Parse(format!("unexpected response body: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TierError::Parse("response has no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LlmProvider;

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "deepseek-chat",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_response_body_content() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"[]"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let config = ModelConfig::with_provider(LlmProvider::OpenAI, "any")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout_secs(2);
        let client = ChatCompletionClient::new(config).unwrap();

        let err = client
            .complete("sys", "usr", Some("sk-test"))
            .await
            .unwrap_err();
        assert!(err.triggers_fallback());
    }

    #[test]
    fn test_blank_credential_never_succeeds() {
        let config = ModelConfig::with_provider(LlmProvider::OpenAI, "any")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout_secs(2);
        let client = ChatCompletionClient::new(config).unwrap();

        let result = tokio_test::block_on(client.complete("sys", "usr", Some("   ")));
        assert!(matches!(result, Err(TierError::Provider(_))));
    }
}
