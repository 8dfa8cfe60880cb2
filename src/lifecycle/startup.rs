//! Startup orchestration.
//!
//! Config first, then logging and metrics, then the server; the listener
//! binds last so traffic only arrives once everything is ready. Any startup
//! error is fatal.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Errors that stop the relay from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start the relay with a validated configuration and serve until shutdown.
pub async fn run(config: RelayConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        max_redirects = config.upstream.max_redirects,
        max_body_bytes = config.limits.max_body_bytes,
        exact_origins = config.origins.exact.len(),
        origin_patterns = config.origins.patterns.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
