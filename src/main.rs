//! FraudShield - Main Entry Point
//!
//! Loads the classifier, fetches decorative assets and serves the web UI.

use anyhow::{Context, Result};
use fraudshield::{
    config::{AppConfig, LoggingConfig},
    models::inference::InferenceEngine,
    web::{router, AppState},
    AnimationAssets,
};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    info!("Starting FraudShield");

    // Without a model there is nothing to serve
    let engine = InferenceEngine::new(&config).map_err(|e| {
        error!(path = %config.model.path, error = %format!("{e:#}"), "Cannot start without a fraud model");
        e
    })?;
    info!(model = %engine.model_name(), "Inference engine ready");

    let animations = AnimationAssets::load(&config.animations).await;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!(
        processing_delay_ms = config.ui.processing_delay_ms,
        max_history = config.session.max_history,
        idle_timeout_secs = config.session.idle_timeout_secs,
        "Session settings"
    );

    let state = AppState::new(engine, animations, config);
    let metrics = state.metrics.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🛡️ FraudShield listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("FraudShield shutting down...");
    metrics.log_summary();

    Ok(())
}

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("fraudshield={},tower_http=info", logging.level))
    });

    if logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
