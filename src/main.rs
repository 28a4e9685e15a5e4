//! Event Bus Service - Binary Entry Point
//!
//! Boots the bus from environment configuration and serves the HTTP
//! API until Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use event_bus::api::http::create_router;
use event_bus::{BusConfig, EventBus};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = BusConfig::from_env();
    info!(
        port = config.port,
        max_attempts = config.retry.max_attempts,
        retry_delay_ms = config.retry.retry_delay.as_millis() as u64,
        request_timeout_ms = config.request_timeout.as_millis() as u64,
        "event bus starting"
    );

    let port = config.port;
    let bus = Arc::new(EventBus::new(config)?);
    let app = create_router(bus);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "event bus listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event bus stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl+C
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
