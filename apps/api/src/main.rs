mod chat;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod profile;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::{LlmClient, ModelGateway};
use crate::routes::build_router;
use crate::session::{signing_key, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Norte API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite and apply the schema
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Session cookie signing key (random per process when no secret is set)
    let session_key = signing_key(config.session_secret.as_deref())?;

    // Model gateway. Without an API key the server still serves /health and
    // /report; the AI routes answer 503 until a key is configured.
    let gateway = match &config.openai_api_key {
        Some(api_key) => {
            info!("Chat model client initialized (model: {})", config.openai_model);
            ModelGateway::with_model(Arc::new(LlmClient::new(
                api_key.clone(),
                config.openai_model.clone(),
            )))
        }
        None => {
            warn!("OPENAI_API_KEY not set; AI routes will answer 503");
            ModelGateway::unavailable()
        }
    };

    // Build app state
    let state = AppState {
        db,
        gateway,
        sessions: SessionStore::new(),
        session_key,
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
