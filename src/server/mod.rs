//! HTTP server for the portfolio chat widget
//!
//! - POST /api/chat - relay a message to the model
//! - GET /health - model list reachability
//! - everything else - static site files, when a static root is configured

pub mod error;
mod handlers;
pub mod types;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::llm::{GeminiClient, GenerationBackend};
use crate::relay::{Relay, RelaySettings};

pub use types::{ChatReply, ChatRequest, HealthResponse};

/// Max request body size for the chat endpoint
const CHAT_MAX_BODY_BYTES: usize = 64 * 1024;

// ============================================================================
// Server State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    /// Hide internal error text from clients
    pub production: bool,
}

impl AppState {
    pub fn new(relay: Arc<Relay>, production: bool) -> Self {
        Self { relay, production }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Create the router with all endpoints
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut router = Router::new()
        .route(
            "/api/chat",
            post(handlers::chat_handler).layer(DefaultBodyLimit::max(CHAT_MAX_BODY_BYTES)),
        )
        .route("/health", get(handlers::health_handler));

    match static_dir {
        Some(dir) if dir.is_dir() => {
            router = router.fallback_service(ServeDir::new(dir));
        }
        Some(dir) => warn!(path = %dir.display(), "Static directory not found; serving API only"),
        None => {}
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Build the relay state from configuration
pub fn build_state(config: &RelayConfig) -> Result<AppState> {
    let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiClient::new(
        config.api_key.clone(),
        config.api_base.clone(),
        config.request_timeout,
    )?);
    let relay = Arc::new(Relay::new(backend, RelaySettings::from_config(config)));
    Ok(AppState::new(relay, config.production))
}

/// Run the HTTP server until ctrl-c
pub async fn run(config: RelayConfig) -> Result<()> {
    config.log_summary();

    let state = build_state(&config)?;
    let app = create_router(state.clone(), config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Server listening at http://{}", listener.local_addr()?);

    // Warm the model cache without delaying startup
    let relay = state.relay.clone();
    tokio::spawn(async move {
        match relay.discovered_models().await {
            Ok(models) => info!(models = ?models, "Discovered models supporting generateContent"),
            Err(e) => warn!(error = %e, "Could not list models at startup"),
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
