mod config;
mod embedder;
mod errors;
mod matcher;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedder::HttpEmbedder;
use crate::matcher::Matcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the embedding model client
    let embed_timeout = Duration::from_secs(config.embed_timeout_secs);
    let embedder = HttpEmbedder::new(&config.embedder_url, config.embedder_model.clone(), embed_timeout)
        .context("Failed to build embedder client")?;
    info!(
        "Embedder client initialized (service: {}, model: {})",
        config.embedder_url, config.embedder_model
    );

    // Build the corpus and embedding index before accepting any traffic.
    // A failure here is fatal: the service must not come up in a
    // match-always-empty state.
    let matcher = Arc::new(Matcher::new(Arc::new(embedder), embed_timeout));
    matcher
        .load(&config.dataset_path, config.embed_batch_size)
        .await
        .with_context(|| format!("Failed to load dataset {}", config.dataset_path.display()))?;

    // Build app state
    let state = AppState {
        matcher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
