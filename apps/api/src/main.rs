mod config;
mod document;
mod embedding;
mod errors;
mod grammar;
mod report;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::FastEmbedEncoder;
use crate::grammar::LanguageToolClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the sentence encoder once; downloads the model on first run
    let encoder = FastEmbedEncoder::new(
        config.embedding_model,
        config.embedding_cache_dir.clone(),
    )
    .await?;
    info!("Encoder initialized (model: {})", encoder.kind().name());

    // Initialize grammar client
    let grammar = LanguageToolClient::new(
        &config.languagetool_url,
        Duration::from_secs(config.grammar_timeout_secs),
    )?;
    info!("Grammar client initialized ({})", grammar.check_url());

    // Build app state
    let state = AppState {
        config: config.clone(),
        encoder: Arc::new(encoder),
        grammar: Arc::new(grammar),
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
