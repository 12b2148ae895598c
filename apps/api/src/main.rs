mod config;
mod embeddings;
mod errors;
mod llm_client;
mod loader;
mod routes;
mod screening;
mod session;
mod state;
mod uploads;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embeddings::OpenAiEmbedder;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::extractor::LlmExtractor;
use crate::screening::pipeline::ScreeningPipeline;
use crate::screening::scorer::LlmScorer;
use crate::session::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screening API v{}", env!("CARGO_PKG_VERSION"));

    // Upload storage for job postings and resumes
    config.ensure_data_dirs()?;
    info!("Data directories ready under {}", config.data_dir.display());

    // Initialize LLM client (field extraction + scoring)
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize embeddings client (session index + retrieval)
    let embedder = Arc::new(OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        config.embeddings_base_url.clone(),
        config.embeddings_model.clone(),
    ));
    info!(
        "Embeddings client initialized (model: {})",
        config.embeddings_model
    );

    // Session registry: one vector index per active session identifier
    let registry = Arc::new(SessionRegistry::new(embedder));

    // Screening pipeline with the production extractor and scorer
    let pipeline = Arc::new(ScreeningPipeline::new(
        Arc::clone(&registry),
        Arc::new(LlmExtractor(llm.clone())),
        Arc::new(LlmScorer(llm)),
    ));

    // Build app state
    let state = AppState {
        registry,
        pipeline,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
