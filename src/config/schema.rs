//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the form relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream automation backend.
    pub upstream: UpstreamConfig,

    /// Caller origins allowed to submit.
    pub origins: OriginConfig,

    /// Inbound payload limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream automation backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Fixed URL every submission is POSTed to.
    pub url: String,

    /// Redirect hops followed after the initial attempt.
    pub max_redirects: u32,

    /// Total timeout per outbound request in seconds.
    pub timeout_secs: u64,

    /// Deadline for the whole forward, every hop included, in seconds.
    /// Must stay below `timeouts.request_secs`.
    pub deadline_secs: u64,

    /// Largest upstream response body buffered, in bytes.
    pub max_response_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_redirects: 3,
            timeout_secs: 10,
            deadline_secs: 25,
            max_response_bytes: 1024 * 1024,
        }
    }
}

/// Origin allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Exact origins, compared case-insensitively after trimming.
    pub exact: Vec<String>,

    /// Regex rules tried in order after the exact set.
    pub patterns: Vec<String>,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            exact: vec![
                "https://www.veikraft.com".to_string(),
                "https://veikraft.com".to_string(),
            ],
            patterns: vec![
                // Preview deployments
                r"^https://veikraft[a-z0-9-]*\.vercel\.app$".to_string(),
                // Local development on any port
                r"^https?://localhost(:\d+)?$".to_string(),
            ],
        }
    }
}

/// Inbound payload limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 8000,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            url = "https://script.example.com/exec"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.url, "https://script.example.com/exec");
        assert_eq!(config.upstream.max_redirects, 3);
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.upstream.deadline_secs, 25);
        assert_eq!(config.upstream.max_response_bytes, 1024 * 1024);
        assert_eq!(config.limits.max_body_bytes, 8000);
        assert_eq!(config.origins.exact.len(), 2);
        assert_eq!(config.origins.patterns.len(), 2);
    }
}
