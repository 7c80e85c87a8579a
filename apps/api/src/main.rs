mod assistant;
mod config;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::session::SessionManager;
use crate::config::Config;
use crate::llm_client::{CompletionService, LlmClient};
use crate::matching::ranking::BatchRanker;
use crate::matching::scorer::{KeywordMatchScorer, LlmMatchScorer, MatchScorer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn CompletionService> = Arc::new(
        LlmClient::new(config.anthropic_api_key.clone()).context("Failed to build LLM client")?,
    );
    info!(
        "LLM client initialized (model: {}, call timeout: {:?})",
        llm_client::MODEL,
        config.llm_call_timeout
    );

    // Chat sessions, swept for idle ones in the background
    let sessions = Arc::new(SessionManager::new(
        llm.clone(),
        config.llm_call_timeout,
        config.session_ttl,
    ));
    let sweeper = sessions.clone().spawn_sweeper(config.session_sweep_interval);
    info!("Session manager initialized (idle TTL: {:?})", config.session_ttl);

    // Job ranking with bounded fan-out (LlmMatchScorer unless ENABLE_LLM_MATCH_SCORING=false)
    let scorer: Arc<dyn MatchScorer> = if config.llm_match_scoring {
        Arc::new(LlmMatchScorer::new(llm, config.llm_call_timeout))
    } else {
        Arc::new(KeywordMatchScorer)
    };
    let shutdown = CancellationToken::new();
    let ranker = Arc::new(
        BatchRanker::new(scorer, config.rank_concurrency).with_shutdown(shutdown.clone()),
    );
    info!(
        "Batch ranker initialized (llm scoring: {}, max in flight: {})",
        config.llm_match_scoring, config.rank_concurrency
    );

    let state = AppState { sessions, ranker };

    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .context("CORS_ORIGIN must be a valid header value")?,
            )
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    sweeper.abort();
    info!("Shut down cleanly");
    Ok(())
}

/// Resolves on Ctrl-C and cancels in-flight ranking batches.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
