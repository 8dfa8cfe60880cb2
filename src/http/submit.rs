//! The `/api/submit` handler.
//!
//! # Gate Order
//! ```text
//! OPTIONS            → 204 (preflight, whatever the origin)
//! not POST           → 405 Method not allowed
//! untrusted origin   → 403 Forbidden origin
//! empty / oversized  → 400 Payload too large or empty
//! not JSON           → 400 Invalid JSON
//! not a JSON object  → 400 Invalid payload
//! otherwise          → forward upstream, relay result (200 / 502)
//! forward too slow   → 502 once the forward deadline passes
//! ```
//!
//! The first failing check answers; nothing is forwarded after a rejection.
//! CORS headers are written on every response, including rejections.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::request::request_id;
use crate::http::response::{json_error, relay, upstream_failure};
use crate::observability::metrics;
use crate::security::{apply_cors_headers, read_payload, OriginPolicy};
use crate::upstream::{Forward, ForwardError};

/// Immutable state shared by every submission.
#[derive(Clone)]
pub struct AppState {
    pub origins: Arc<OriginPolicy>,
    pub forwarder: Arc<dyn Forward>,
    pub max_body_bytes: usize,
    /// Budget for the whole forward. Must stay below the inbound request timeout.
    pub forward_deadline: Duration,
}

/// Gate, forward and relay one submission.
pub async fn submit_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let allowed = state.origins.check(&parts.headers);

    let (outcome, mut response) =
        handle(&state, &parts.method, allowed.is_some(), body, &request_id).await;

    apply_cors_headers(response.headers_mut(), allowed.as_deref());
    metrics::record_submission(outcome, response.status().as_u16(), start);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        outcome,
        status = response.status().as_u16(),
        "Submission handled"
    );

    response
}

async fn handle(
    state: &AppState,
    method: &Method,
    trusted: bool,
    body: Body,
    request_id: &str,
) -> (&'static str, Response) {
    if *method == Method::OPTIONS {
        return ("preflight", StatusCode::NO_CONTENT.into_response());
    }

    if *method != Method::POST {
        return (
            "method_not_allowed",
            json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        );
    }

    if !trusted {
        tracing::warn!(request_id = %request_id, "Rejected submission from untrusted origin");
        return (
            "forbidden_origin",
            json_error(StatusCode::FORBIDDEN, "Forbidden origin"),
        );
    }

    let payload = match read_payload(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(request_id = %request_id, reason = %e, "Rejected payload");
            return ("invalid_payload", json_error(StatusCode::BAD_REQUEST, &e.to_string()));
        }
    };

    let forwarded = tokio::time::timeout(state.forward_deadline, state.forwarder.forward(payload))
        .await
        .unwrap_or(Err(ForwardError::DeadlineExceeded(state.forward_deadline)));

    match forwarded {
        Ok(upstream) => {
            metrics::record_hops(upstream.hops);
            let (status, body) = relay(&upstream);
            if upstream.is_success() {
                ("forwarded", (status, Json(body)).into_response())
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    upstream_status = %upstream.status,
                    "Automation backend returned an error"
                );
                ("upstream_error", (status, Json(body)).into_response())
            }
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Automation backend unreachable");
            ("upstream_failure", upstream_failure())
        }
    }
}
