mod config;
mod errors;
mod llm_client;
mod ranking;
mod routes;
mod state;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::ranking::oracle::LlmScoringOracle;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client and the scoring oracle backed by it
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let oracle = Arc::new(LlmScoringOracle::new(llm.clone()));
    info!("Scoring oracle initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        llm,
        oracle,
        config: config.clone(),
    };

    // Build router. The body limit covers a whole multipart batch, so it is
    // sized as a multiple of the per-file cap.
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_batch_body_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
