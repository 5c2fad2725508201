mod config;
mod errors;
mod llm_client;
mod matching;
mod pdf;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::advice::LlmAdviceService;
use crate::matching::embedding::FastEmbedder;
use crate::matching::keywords::LlmKeywordService;
use crate::matching::pipeline::MatchingServices;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fitscore API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (keywords + advice)
    let llm = LlmClient::new(
        &config.llm_base_url,
        &config.llm_model,
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", llm.model());
    if config.llm_api_key.is_none() {
        info!("No LLM_API_KEY configured; requests must send the x-llm-api-key header");
    }

    // Embedding model: one handle for the whole process, loaded once
    let embedder = Arc::new(FastEmbedder::new(
        &config.embedding_model,
        &config.embedding_cache_dir,
    ));
    if config.preload_embedding_model {
        embedder.warm_up().await?;
    } else {
        info!(
            "Embedding model {} will load on first analysis",
            embedder.model_name()
        );
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        services: MatchingServices {
            embedder,
            keywords: Arc::new(LlmKeywordService(llm.clone())),
            advisor: Arc::new(LlmAdviceService(llm)),
        },
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
