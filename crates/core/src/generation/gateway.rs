//! # Tag Generation Gateway
//!
//! One best-effort provider call per request, topped up from the fallback
//! table when the provider fails or comes back short. Provider and parse
//! failures are logged and absorbed; only validation errors reach the caller.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::fallback::fallback;
use super::parse::tags_from_response;
use super::prompts;
use super::provider::TextGenerator;
use crate::error::{TierError, TierResult};
use crate::state::Tag;

pub const DEFAULT_COUNT: usize = 5;
pub const MAX_COUNT: usize = 20;

const MISSING_CATEGORY: &str = "请输入类别";
const GENERIC_FAILURE: &str = "生成标签失败，请稍后重试";

/// Where the returned tags came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TagSource {
    /// Every tag came from the provider
    Ai,
    /// Provider tags first, topped up from the fallback table
    Mixed,
    /// Provider contributed nothing
    Fallback,
}

impl TagSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Mixed => "mixed",
            Self::Fallback => "fallback",
        }
    }
}

/// Tag generation request as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub category: String,
    /// Defaults to 5, clamped to 20
    #[serde(default)]
    pub count: Option<i64>,
    /// API key for this request; falls back to the provider's env var
    #[serde(default, alias = "apiKey")]
    pub credential: Option<String>,
}

/// Tag generation response as sent to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TagSource>,
}

impl GenerateResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            tags: Vec::new(),
            summary: None,
            error: Some(message.into()),
            source: None,
        }
    }

    /// Generic failure for errors that should not leak details to the UI
    pub fn internal_failure() -> Self {
        Self::failure(GENERIC_FAILURE)
    }

    /// Wire form of a generation result: validation problems keep their
    /// message, anything else becomes the generic failure.
    pub fn from_result(result: TierResult<GenerationOutcome>) -> Self {
        match result {
            Ok(outcome) => outcome.into_response(),
            Err(TierError::Validation(message)) => Self::failure(message),
            Err(e) => {
                tracing::error!(error = %e, "Tag generation failed");
                Self::internal_failure()
            }
        }
    }
}

/// Result of a successful generation
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub category: String,
    /// Provider tags first, then fallback tags
    pub tags: Vec<Tag>,
    pub source: TagSource,
    pub ai_count: usize,
    /// Why the provider contributed nothing, if it failed outright
    pub provider_error: Option<TierError>,
}

impl GenerationOutcome {
    pub fn fallback_count(&self) -> usize {
        self.tags.len() - self.ai_count
    }

    pub fn summary(&self) -> String {
        format!("已为您生成{}个{}相关的标签", self.tags.len(), self.category)
    }

    pub fn into_response(self) -> GenerateResponse {
        GenerateResponse {
            success: true,
            summary: Some(self.summary()),
            source: Some(self.source),
            tags: self.tags,
            error: None,
        }
    }
}

/// Resolve a requested count: absent means the default, anything below one
/// is rejected, anything above the limit is clamped.
pub fn normalize_count(count: Option<i64>) -> TierResult<usize> {
    match count {
        None => Ok(DEFAULT_COUNT),
        Some(n) if n < 1 => Err(TierError::Validation(format!(
            "count must be at least 1 (got {})",
            n
        ))),
        Some(n) => Ok((n as u64).min(MAX_COUNT as u64) as usize),
    }
}

/// Generates tag lists for a category
#[derive(Clone)]
pub struct TagGenerator {
    provider: Arc<dyn TextGenerator>,
}

impl TagGenerator {
    pub fn new(provider: Arc<dyn TextGenerator>) -> Self {
        Self { provider }
    }

    /// Generate up to `count` tags for `category`. Fails only on invalid
    /// input; provider trouble is covered by the fallback table.
    #[tracing::instrument(skip(self, credential))]
    pub async fn generate(
        &self,
        category: &str,
        count: usize,
        credential: Option<&str>,
    ) -> TierResult<GenerationOutcome> {
        let category = category.trim();
        if category.is_empty() {
            return Err(TierError::Validation(MISSING_CATEGORY.to_string()));
        }
        if count == 0 {
            return Err(TierError::Validation("count must be at least 1".to_string()));
        }

        let (mut tags, provider_error) = match self.ask_provider(category, count, credential).await {
            Ok(tags) if tags.is_empty() => (
                tags,
                Some(TierError::Parse("provider returned no usable items".to_string())),
            ),
            Ok(tags) => (tags, None),
            Err(e) => (Vec::new(), Some(e)),
        };

        if let Some(e) = &provider_error {
            tracing::warn!(error = %e, "Provider unavailable, using fallback table");
        }

        let ai_count = tags.len();
        if ai_count < count {
            let extra = fallback(category, count - ai_count);
            tracing::info!(ai_count, fallback_count = extra.len(), "Topping up from fallback table");
            tags.extend(extra);
        }

        let source = match ai_count {
            0 => TagSource::Fallback,
            n if n == tags.len() => TagSource::Ai,
            _ => TagSource::Mixed,
        };

        tracing::info!(total = tags.len(), ?source, "Tags generated");

        Ok(GenerationOutcome {
            category: category.to_string(),
            tags,
            source,
            ai_count,
            provider_error,
        })
    }

    async fn ask_provider(
        &self,
        category: &str,
        count: usize,
        credential: Option<&str>,
    ) -> TierResult<Vec<Tag>> {
        let text = self
            .provider
            .complete(
                prompts::TAG_GENERATOR,
                &prompts::tag_request(category, count),
                credential,
            )
            .await?;
        tracing::debug!(chars = text.chars().count(), "Provider responded");
        tags_from_response(&text, count)
    }

    /// Serve a wire request. Never fails: validation problems come back with
    /// their message, anything else as a generic failure.
    pub async fn handle(&self, request: GenerateRequest) -> GenerateResponse {
        let result = match normalize_count(request.count) {
            Ok(count) => {
                self.generate(&request.category, count, request.credential.as_deref())
                    .await
            }
            Err(e) => Err(e),
        };

        GenerateResponse::from_result(result)
    }
}
