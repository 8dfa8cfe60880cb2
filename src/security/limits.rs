//! Inbound payload limits.
//!
//! # Responsibilities
//! - Enforce the maximum request body size
//! - Reject empty bodies
//! - Require a JSON object at the top level
//!
//! The accepted bytes are returned untouched so they can be forwarded
//! byte-for-byte.

use axum::body::{Body, Bytes};
use serde_json::Value;

/// Why an inbound payload was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Payload too large or empty")]
    TooLargeOrEmpty,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Invalid payload")]
    NotAnObject,
}

/// Read at most `max_bytes` from the body and check it holds a JSON object.
pub async fn read_payload(body: Body, max_bytes: usize) -> Result<Bytes, PayloadError> {
    let bytes = axum::body::to_bytes(body, max_bytes)
        .await
        .map_err(|_| PayloadError::TooLargeOrEmpty)?;
    check_payload(&bytes)?;
    Ok(bytes)
}

/// Shape checks on an already-buffered body.
pub fn check_payload(bytes: &[u8]) -> Result<(), PayloadError> {
    if bytes.is_empty() {
        return Err(PayloadError::TooLargeOrEmpty);
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(_)) => Ok(()),
        Ok(_) => Err(PayloadError::NotAnObject),
        Err(_) => Err(PayloadError::InvalidJson),
    }
}
