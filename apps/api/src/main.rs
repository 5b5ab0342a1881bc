mod config;
mod errors;
mod llm_client;
mod models;
mod recommendation;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::recommendation::fallback::FallbackRecord;
use crate::recommendation::recommender::select_recommender;
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career API v{}", env!("CARGO_PKG_VERSION"));

    // Fallback record is validated even when a key is configured, so a bad file fails startup
    let fallback = FallbackRecord::load(config.fallback_record_path.as_deref())?;
    info!("Fallback record '{}' loaded", fallback.version);

    let llm = match &config.gemini_api_key {
        Some(key) => Some(LlmClient::new(
            config.gemini_api_url.clone(),
            key.clone(),
            config.recommendation_timeout,
        )?),
        None => None,
    };
    let recommender = select_recommender(llm, fallback);

    let state = AppState {
        sessions: Arc::new(SessionStore::new()),
        recommender,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(
        "Listening on {addr}, serving static files from {} (recommendation timeout {}s)",
        config.static_dir.display(),
        config.recommendation_timeout.as_secs()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
