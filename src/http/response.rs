//! Response normalization.
//!
//! # Responsibilities
//! - Turn the final upstream response into the `{ok, ...}` shape callers expect
//! - Map upstream failures to 502 without leaking their detail
//! - Build the short `{ok:false, error}` bodies used by the request gate

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::upstream::UpstreamResponse;

/// Message returned to callers when the upstream cannot be reached.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to reach the automation backend";

/// A `{ok:false, error}` response with the given status.
pub fn json_error(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "ok": false, "error": error }))).into_response()
}

/// Status and body relayed for a completed upstream exchange.
///
/// A JSON body is passed through untouched; anything else is wrapped as
/// `{ok, raw}`. The status is 200 when the upstream succeeded, 502 otherwise.
pub fn relay(upstream: &UpstreamResponse) -> (StatusCode, Value) {
    let ok = upstream.is_success();
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    let body = serde_json::from_str::<Value>(&upstream.body)
        .unwrap_or_else(|_| json!({ "ok": ok, "raw": upstream.body }));

    (status, body)
}

/// The response sent when forwarding failed outright.
pub fn upstream_failure() -> Response {
    json_error(StatusCode::BAD_GATEWAY, UPSTREAM_FAILURE_MESSAGE)
}
