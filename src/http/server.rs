//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the submit and health handlers
//! - Wire up middleware (tracing, timeout, request ID, fixed response headers)
//! - Compile configuration into immutable handler state
//! - Serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::submit::{submit_handler, AppState};
use crate::lifecycle::shutdown::shutdown_signal;
use crate::security::OriginPolicy;
use crate::upstream::{Forward, RedirectForwarder, SetupError};

/// Path of the submission endpoint.
pub const SUBMIT_PATH: &str = "/api/submit";

/// Errors turning configuration into a running server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid origin pattern: {0}")]
    OriginPattern(#[from] regex::Error),

    #[error(transparent)]
    Upstream(#[from] SetupError),
}

/// HTTP server for the form relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server that forwards to the configured upstream.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let forwarder = RedirectForwarder::from_config(&config.upstream)?;
        Self::with_forwarder(config, Arc::new(forwarder))
    }

    /// Create a server around a caller-supplied forwarder.
    pub fn with_forwarder(
        config: RelayConfig,
        forwarder: Arc<dyn Forward>,
    ) -> Result<Self, ServerError> {
        let state = AppState {
            origins: Arc::new(OriginPolicy::from_config(&config.origins)?),
            forwarder,
            max_body_bytes: config.limits.max_body_bytes,
            forward_deadline: Duration::from_secs(config.upstream.deadline_secs),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route(SUBMIT_PATH, any(submit_handler))
            .route("/health", get(health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires or a signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// `GET /health`: liveness check.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}
