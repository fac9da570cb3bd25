mod config;
mod errors;
mod llm_client;
mod quotes;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Greetings API v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config).context("Failed to build LLM client")?;
    if state.llm.is_some() {
        info!(
            "LLM client initialized (model: {}, base: {})",
            llm_client::MODEL,
            config.openai_base_url
        );
    } else {
        warn!("OPENAI_API_KEY is not set; /api/generate will return 500 until it is configured");
    }

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
