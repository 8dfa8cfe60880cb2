//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All errors are collected
//! rather than stopping at the first one.

use std::net::SocketAddr;

use regex::Regex;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.url is empty")]
    MissingUpstream,

    #[error("upstream.url '{0}' is not a valid http(s) URL")]
    UpstreamUrl(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    UpstreamTimeout,

    #[error("upstream.deadline_secs ({deadline}) must be positive and below timeouts.request_secs ({request})")]
    UpstreamDeadline { deadline: u64, request: u64 },

    #[error("upstream.max_response_bytes must be greater than zero")]
    ResponseLimit,

    #[error("origins.patterns entry '{pattern}' does not compile: {reason}")]
    OriginPattern { pattern: String, reason: String },

    #[error("limits.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let upstream = config.upstream.url.trim();
    if upstream.is_empty() {
        errors.push(ValidationError::MissingUpstream);
    } else {
        match Url::parse(upstream) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::UpstreamUrl(upstream.to_string())),
        }
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::UpstreamTimeout);
    }

    let deadline = config.upstream.deadline_secs;
    let request = config.timeouts.request_secs;
    if deadline == 0 || (request > 0 && deadline >= request) {
        errors.push(ValidationError::UpstreamDeadline { deadline, request });
    }

    if config.upstream.max_response_bytes == 0 {
        errors.push(ValidationError::ResponseLimit);
    }

    for pattern in &config.origins.patterns {
        if let Err(e) = Regex::new(pattern) {
            errors.push(ValidationError::OriginPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.upstream.url = "https://script.example.com/macros/s/abc/exec".into();
        config
    }

    #[test]
    fn test_defaults_with_upstream_are_valid() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_default_config_requires_upstream() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingUpstream]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.upstream.url = "ftp://files.example.com".into();
        config.origins.patterns.push("^https://(unclosed".into());
        config.limits.max_body_bytes = 0;
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::UpstreamUrl("ftp://files.example.com".into())));
        assert!(errors.contains(&ValidationError::BodyLimit));
        assert!(errors.contains(&ValidationError::RequestTimeout));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::OriginPattern { .. })));
    }

    #[test]
    fn test_deadline_must_fit_inside_request_timeout() {
        let mut config = valid();
        config.upstream.deadline_secs = 30;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::UpstreamDeadline {
                deadline: 30,
                request: 30
            }])
        );

        config.timeouts.request_secs = 31;
        assert!(validate_config(&config).is_ok());

        config.upstream.deadline_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_response_limit_must_be_positive() {
        let mut config = valid();
        config.upstream.max_response_bytes = 0;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ResponseLimit])
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid();
        config.observability.metrics_address = "not-an-address".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MetricsAddress("not-an-address".into())])
        );
    }
}
