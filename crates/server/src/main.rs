//! Tier List Server
//!
//! Axum server exposing the ranking board and the tag generation gateway.
//! The board lives in memory for the lifetime of the process.

mod api;
mod config;
mod telemetry;

use axum::{
    body::Body,
    http::{header, Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc};
use tierlist_core::generation::{
    ChatCompletionClient, GenerateRequest, TagGenerator, DEFAULT_COUNT,
};
use tierlist_core::state::Board;
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock},
};
use utoipa::OpenApi;

use config::PersistedConfig;

/// Application state
pub struct AppState {
    board: RwLock<Board>,
    config: RwLock<PersistedConfig>,
    /// Rebuilt whenever the provider config changes
    generator: RwLock<TagGenerator>,
    /// Held by the running generation task until it finishes
    generation_lock: Arc<Mutex<()>>,
}

impl AppState {
    fn new(config: PersistedConfig) -> anyhow::Result<Self> {
        let client = ChatCompletionClient::new(config.to_model_config())?;
        Ok(Self::with_generator(config, TagGenerator::new(Arc::new(client))))
    }

    fn with_generator(config: PersistedConfig, generator: TagGenerator) -> Self {
        Self {
            board: RwLock::new(Board::new()),
            config: RwLock::new(config),
            generator: RwLock::new(generator),
            generation_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Parser, Clone)]
#[command(author, version, about = "Tier list ranking board with AI tag generation")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Generate tags for a category and print them (no server)
    Generate {
        /// Category to generate tags for, e.g. 奶茶
        category: String,
        /// Number of tags to generate
        #[arg(short, long, default_value_t = DEFAULT_COUNT as i64)]
        count: i64,
        /// API key for the configured provider
        #[arg(long)]
        api_key: Option<String>,
    },
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tier List API",
        version = "1.0.0",
        description = "API for the tier list ranking board and tag generation"
    ),
    paths(
        api::board::get_board,
        api::board::add_tag,
        api::board::add_tags,
        api::board::move_tag,
        api::board::toggle_selection,
        api::board::delete_selected,
        api::board::reset_board,
        api::generate::generate_tags,
        api::generate::get_config,
        api::generate::update_config,
        api::generate::get_providers,
        api::generate::get_levels
    ),
    components(
        schemas(
            api::board::AddTagRequest,
            api::board::AddTagsRequest,
            api::board::MoveTagRequest,
            api::board::ToggleSelectionRequest,
            api::board::BoardActionResponse,
            tierlist_core::generation::GenerateRequest,
            tierlist_core::generation::GenerateResponse,
            tierlist_core::generation::TagSource,
            api::generate::EffectiveConfig,
            api::generate::ConfigResponse,
            api::generate::ProviderInfo,
            api::generate::ProvidersResponse,
            api::generate::LevelInfo,
            PersistedConfig
        )
    ),
    tags(
        (name = "board", description = "Ranking board actions"),
        (name = "generation", description = "AI tag generation"),
        (name = "config", description = "Provider configuration")
    )
)]
struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    match ApiDoc::openapi().to_json() {
        Ok(doc) => Response::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(doc))
            .unwrap_or_default(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI document");
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .unwrap_or_default()
        }
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .nest("/api/v1/board", api::board::board_routes())
        .route("/api/generate-tags", post(api::generate::generate_tags))
        .route("/api/v1/levels", get(api::generate::get_levels))
        .route(
            "/api/v1/config",
            get(api::generate::get_config).patch(api::generate::update_config),
        )
        .route("/api/v1/providers", get(api::generate::get_providers))
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state)
}

// === Server Entry ===

async fn run_server(config: PersistedConfig, port: u16) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("🚀 Tier List Server running at http://{}", addr);
    println!("   Routes:");
    println!("   Generate:  /api/generate-tags (POST)");
    println!("   Board:     /api/v1/board, /tags, /tags/bulk, /move");
    println!("   Selection: /api/v1/board/selection/toggle, /delete");
    println!("   Reset:     /api/v1/board/reset (POST)");
    println!("   Levels:    /api/v1/levels (GET)");
    println!("   Config:    /api/v1/config (GET, PATCH)");
    println!("   Providers: /api/v1/providers (GET)");
    println!("   OpenAPI:   /api/v1/openapi.json");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_generate(
    config: PersistedConfig,
    category: String,
    count: i64,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let client = ChatCompletionClient::new(config.to_model_config())?;
    let generator = TagGenerator::new(Arc::new(client));

    println!("🏷️  Generating tags for: {}", category);
    let response = generator
        .handle(GenerateRequest {
            category,
            count: Some(count),
            credential: api_key,
        })
        .await;

    if !response.success {
        anyhow::bail!(response.error.unwrap_or_default());
    }
    if let Some(summary) = &response.summary {
        println!("✅ {}", summary);
    }
    if let Some(source) = response.source {
        println!("   Source: {}", source.as_str());
    }
    for (i, tag) in response.tags.iter().enumerate() {
        println!("   {:>2}. {}", i + 1, tag.content);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing()?;

    println!("╔══════════════════════════════════════╗");
    println!("║          TIER LIST SERVER            ║");
    println!("╚══════════════════════════════════════╝");

    let args = Args::parse();
    let config = PersistedConfig::load().await;

    match args.command {
        Some(CliCommand::Generate {
            category,
            count,
            api_key,
        }) => run_generate(config, category, count, api_key).await,
        Some(CliCommand::Serve { port }) => run_server(config, port).await,
        None => run_server(config, 8080).await,
    }
}

#[cfg(test)]
mod test_support {
    use super::*;
    use async_trait::async_trait;
    use tierlist_core::generation::TextGenerator;
    use tierlist_core::{TierError, TierResult};

    /// Provider stub that always answers with the same result
    struct FixedReply(TierResult<String>);

    #[async_trait]
    impl TextGenerator for FixedReply {
        async fn complete(
            &self,
            _system: &str,
            _user: &str,
            _credential: Option<&str>,
        ) -> TierResult<String> {
            self.0.clone()
        }
    }

    pub fn state_with_provider(provider: Arc<dyn TextGenerator>) -> SharedState {
        let generator = TagGenerator::new(provider);
        Arc::new(AppState::with_generator(PersistedConfig::default(), generator))
    }

    fn state_with(reply: TierResult<String>) -> SharedState {
        state_with_provider(Arc::new(FixedReply(reply)))
    }

    /// State whose provider is always unreachable
    pub fn test_state() -> SharedState {
        state_with(Err(TierError::Provider("unreachable".to_string())))
    }

    pub fn state_with_reply(text: &str) -> SharedState {
        state_with(Ok(text.to_string()))
    }
}
