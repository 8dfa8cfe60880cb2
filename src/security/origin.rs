//! Caller origin allow-list and CORS response headers.
//!
//! # Matching Rules
//! Checked in order, first match wins:
//! 1. Exact match against the configured origin set
//! 2. Each configured regex pattern, in order
//!
//! The caller origin is trimmed and lowercased before matching, and the
//! normalized value is what gets echoed in `Access-Control-Allow-Origin`.

use std::collections::HashSet;

use axum::http::{header, HeaderMap, HeaderValue};
use regex::Regex;

use crate::config::OriginConfig;

/// Compiled origin allow-list.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: HashSet<String>,
    patterns: Vec<Regex>,
}

impl OriginPolicy {
    /// Compile the policy from configuration.
    pub fn from_config(config: &OriginConfig) -> Result<Self, regex::Error> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exact: config
                .exact
                .iter()
                .map(|o| o.trim().to_lowercase())
                .collect(),
            patterns,
        })
    }

    /// Return the origin to echo back, or `None` if the caller is untrusted.
    pub fn allowed_origin(&self, origin: &str) -> Option<String> {
        let origin = origin.trim().to_lowercase();
        if origin.is_empty() {
            return None;
        }

        if self.exact.contains(&origin) || self.patterns.iter().any(|p| p.is_match(&origin)) {
            Some(origin)
        } else {
            None
        }
    }

    /// Resolve the request's `Origin` header against the policy.
    pub fn check(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .and_then(|o| self.allowed_origin(o))
    }
}

/// Write the CORS headers every endpoint response carries.
///
/// `Access-Control-Allow-Origin` is only set for an allowed origin; the rest
/// are set regardless so caches never mix responses across origins.
pub fn apply_cors_headers(headers: &mut HeaderMap, allowed: Option<&str>) {
    if let Some(origin) = allowed.and_then(|o| HeaderValue::from_str(o).ok()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}
