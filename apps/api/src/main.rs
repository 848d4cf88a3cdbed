mod advisor;
mod config;
mod errors;
mod listings;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisor::prompts::DEFAULT_CV_PROCEDURE;
use crate::advisor::wiki::{WikiClient, WIKI_SUMMARY_URL};
use crate::config::Config;
use crate::listings::cache::DatasetCache;
use crate::listings::regions::RegionWhitelist;
use crate::llm_client::LlmClient;
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

    info!("Starting Magang API v{}", env!("CARGO_PKG_VERSION"));

    // Region whitelist: optional, facets still work without it
    let regions = match RegionWhitelist::load_or_fetch(&config.regions_path, config.regions_fetch)
        .await
    {
        Ok(regions) => regions,
        Err(e) => {
            warn!("Region whitelist unavailable: {e}");
            RegionWhitelist::default()
        }
    };

    // Warm the listing cache; a missing snapshot is reported per request
    let datasets = Arc::new(DatasetCache::new(config.listings_path.clone()));
    if let Err(e) = datasets.get() {
        warn!(
            "No listing snapshot loaded from {}: {e}",
            datasets.source().display()
        );
    }

    // Initialize LLM client
    let llm = LlmClient::new(
        config.llm_model.clone(),
        config.openrouter_api_key.clone(),
        config.llm_timeout_secs,
    )?;
    info!(
        "LLM client initialized (model: {}, server key: {})",
        llm.model(),
        config.openrouter_api_key.is_some()
    );

    let definitions = WikiClient::new(WIKI_SUMMARY_URL)?;

    let cv_procedure: Arc<str> = match &config.cv_prompt_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CV prompt from {}", path.display()))?
            .into(),
        None => Arc::from(DEFAULT_CV_PROCEDURE),
    };

    // Build app state
    let state = AppState {
        datasets,
        regions: Arc::new(regions),
        llm: Arc::new(llm),
        definitions: Arc::new(definitions),
        cv_procedure,
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
