//! # Generation API
//!
//! Tag generation for the "quick add" dialog, plus provider configuration.
//! Only one generation runs at a time; overlapping requests get a 409.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use tierlist_core::generation::{
    normalize_count, ChatCompletionClient, GenerateRequest, GenerateResponse, TagGenerator,
};
use tierlist_core::models::LlmProvider;
use tierlist_core::state::rank_levels;
use tierlist_core::TierError;

use crate::config::PersistedConfig;
use crate::SharedState;

const GENERATION_IN_FLIGHT: &str = "已有生成任务正在进行，请稍候";

fn failure(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<GenerateResponse>) {
    (status, Json(GenerateResponse::failure(message)))
}

/// Generate tags for a category
#[utoipa::path(
    post,
    path = "/api/generate-tags",
    tag = "generation",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Tags generated (AI, fallback, or both)", body = GenerateResponse),
        (status = 400, description = "Missing category or bad count", body = GenerateResponse),
        (status = 409, description = "A generation is already running", body = GenerateResponse),
        (status = 500, description = "Unexpected failure", body = GenerateResponse)
    )
)]
pub async fn generate_tags(
    State(state): State<SharedState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> (StatusCode, Json<GenerateResponse>) {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let count = match normalize_count(req.count) {
        Ok(count) => count,
        Err(e) => return failure(StatusCode::BAD_REQUEST, e.message()),
    };

    let Ok(in_flight) = state.generation_lock.clone().try_lock_owned() else {
        tracing::info!(category = %req.category, "Rejected overlapping generation request");
        return failure(StatusCode::CONFLICT, GENERATION_IN_FLIGHT);
    };

    // The guard moves into the task so the lock outlives a dropped request
    let generator = state.generator.read().await.clone();
    let task = tokio::spawn(async move {
        let result = generator
            .generate(&req.category, count, req.credential.as_deref())
            .await;
        drop(in_flight);
        result
    });

    match task.await {
        Ok(result) => {
            let status = match &result {
                Ok(_) => StatusCode::OK,
                Err(TierError::Validation(_)) => StatusCode::BAD_REQUEST,
                Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(GenerateResponse::from_result(result)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Tag generation task aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerateResponse::internal_failure()),
            )
        }
    }
}

// === Config ===

#[derive(Debug, Serialize, ToSchema)]
pub struct EffectiveConfig {
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub config: PersistedConfig,
    pub effective: EffectiveConfig,
}

fn config_response(config: &PersistedConfig) -> ConfigResponse {
    let model = config.to_model_config();
    ConfigResponse {
        config: config.clone(),
        effective: EffectiveConfig {
            provider: model.provider.id().to_string(),
            endpoint: model.endpoint(),
            model: model.model,
            temperature: model.temperature,
            timeout_secs: model.timeout_secs,
        },
    }
}

/// Get provider configuration
#[utoipa::path(
    get,
    path = "/api/v1/config",
    tag = "config",
    responses(
        (status = 200, description = "Saved and effective configuration", body = ConfigResponse)
    )
)]
pub async fn get_config(State(state): State<SharedState>) -> Json<ConfigResponse> {
    let config = state.config.read().await;
    Json(config_response(&config))
}

/// Update provider configuration (partial)
#[utoipa::path(
    patch,
    path = "/api/v1/config",
    tag = "config",
    request_body = PersistedConfig,
    responses(
        (status = 200, description = "Configuration updated", body = ConfigResponse),
        (status = 500, description = "Provider client could not be built")
    )
)]
pub async fn update_config(
    State(state): State<SharedState>,
    Json(updates): Json<PersistedConfig>,
) -> Result<Json<ConfigResponse>, (StatusCode, String)> {
    let mut config = state.config.write().await;
    let mut merged = config.clone();
    merged.merge(updates);

    let client = ChatCompletionClient::new(merged.to_model_config()).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to build provider client: {}", e),
        )
    })?;
    *state.generator.write().await = TagGenerator::new(Arc::new(client));

    if let Err(e) = merged.save().await {
        tracing::warn!(error = %e, "Failed to save config");
    }
    *config = merged;
    Ok(Json(config_response(&config)))
}

// === Providers & Levels ===

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub default_model: String,
    pub supports_base_url: bool,
    pub env_var: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

/// List supported completion providers
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    tag = "config",
    responses(
        (status = 200, description = "Supported providers", body = ProvidersResponse)
    )
)]
pub async fn get_providers() -> Json<ProvidersResponse> {
    let providers = LlmProvider::all()
        .into_iter()
        .map(|p| ProviderInfo {
            id: p.id().to_string(),
            name: p.display_name().to_string(),
            default_model: p.default_model().to_string(),
            supports_base_url: p.supports_base_url(),
            env_var: p.api_key_env().to_string(),
        })
        .collect();
    Json(ProvidersResponse { providers })
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub id: String,
    pub name: String,
    pub color: String,
    pub text_color: String,
}

/// Rank level names and colors, top tier first
#[utoipa::path(
    get,
    path = "/api/v1/levels",
    tag = "board",
    responses(
        (status = 200, description = "Rank levels in display order", body = [LevelInfo])
    )
)]
pub async fn get_levels() -> Json<Vec<LevelInfo>> {
    Json(
        rank_levels()
            .into_iter()
            .map(|level| LevelInfo {
                id: level.id.as_str().to_string(),
                name: level.name.to_string(),
                color: level.color.to_string(),
                text_color: level.text_color.to_string(),
            })
            .collect(),
    )
}
