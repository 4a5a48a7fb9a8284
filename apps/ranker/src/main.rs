mod config;
mod errors;
mod llm_client;
mod models;
mod ranking;
mod routes;
mod scoring;
mod screening;
mod state;
mod storage;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::build_generator;
use crate::routes::build_router;
use crate::scoring::Scorer;
use crate::screening::Session;
use crate::state::AppState;
use crate::storage::Repository;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing provider credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Ranker v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let store = storage::connect(&config.storage_url).await?;
    let repository = Repository::new(store);

    // Initialize LLM client
    let llm = build_generator(config.llm_provider, config.llm_api_key.clone());
    info!(
        "LLM client initialized ({:?}, model: {})",
        config.llm_provider,
        llm.model()
    );

    // Restore the session from storage
    let session = Session::restore(repository, Scorer::new(llm)).await?;

    let state = AppState {
        session: Arc::new(session),
    };

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
