//! POST forwarding with manual redirect handling.
//!
//! The automation backend answers a POST with a redirect before it returns
//! the real result. Stock HTTP clients turn a redirected POST into a GET and
//! drop the body, so redirects are disabled on the client and followed here
//! by re-sending the original body and content type to each `Location`.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use futures_util::future::BoxFuture;
use url::Url;

use crate::config::UpstreamConfig;

/// Content type of every upstream POST.
pub const UPSTREAM_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Response body cap used when none is configured.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Final non-redirect answer from the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
    /// Redirects followed before this response.
    pub hops: u32,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Ways a forward attempt can fail.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("upstream answered {status} without a Location header")]
    MissingLocation { status: StatusCode },

    #[error("upstream redirect target '{location}' is not a valid URL")]
    InvalidLocation { location: String },

    #[error("too many redirects from upstream (limit {limit})")]
    TooManyRedirects { limit: u32 },

    #[error("upstream response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("upstream did not finish within {}s", .0.as_secs())]
    DeadlineExceeded(Duration),

    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errors building a forwarder from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Something that delivers a submission body to the upstream.
pub trait Forward: Send + Sync {
    fn forward(&self, body: Bytes) -> BoxFuture<'_, Result<UpstreamResponse, ForwardError>>;
}

/// Returns true for the statuses that are re-POSTed to `Location`.
pub fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Forwarder bound to one fixed upstream URL.
#[derive(Debug, Clone)]
pub struct RedirectForwarder {
    client: reqwest::Client,
    target: Url,
    max_redirects: u32,
    max_response_bytes: usize,
}

/// Client settings the forwarder relies on: no automatic redirects and a
/// per-request timeout.
pub fn client_builder(config: &UpstreamConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(config.timeout_secs))
}

impl RedirectForwarder {
    /// Build a forwarder with its own client from configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, SetupError> {
        let client = client_builder(config).build()?;
        let target = Url::parse(config.url.trim())?;
        Ok(Self::with_client(client, target, config.max_redirects)
            .max_response_bytes(config.max_response_bytes))
    }

    /// Build a forwarder around an existing client.
    ///
    /// The client must not follow redirects itself.
    pub fn with_client(client: reqwest::Client, target: Url, max_redirects: u32) -> Self {
        Self {
            client,
            target,
            max_redirects,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    /// Cap the buffered upstream response body.
    pub fn max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// POST `body` to the target, re-sending it on every redirect hop.
    pub async fn post(&self, body: Bytes) -> Result<UpstreamResponse, ForwardError> {
        let mut url = self.target.clone();

        for hop in 0..=self.max_redirects {
            let response = self
                .client
                .post(url.clone())
                .header(header::CONTENT_TYPE, UPSTREAM_CONTENT_TYPE)
                .body(body.clone())
                .send()
                .await?;

            let status = response.status();
            if !is_redirect(status) {
                let body = read_body(response, self.max_response_bytes).await?;
                return Ok(UpstreamResponse {
                    status,
                    body,
                    hops: hop,
                });
            }

            let location = response
                .headers()
                .get(header::LOCATION)
                .ok_or(ForwardError::MissingLocation { status })?;

            url = location
                .to_str()
                .ok()
                .and_then(|l| url.join(l).ok())
                .ok_or_else(|| ForwardError::InvalidLocation {
                    location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
                })?;

            tracing::debug!(
                hop = hop + 1,
                status = %status,
                location = %url,
                "Following upstream redirect"
            );
        }

        Err(ForwardError::TooManyRedirects {
            limit: self.max_redirects,
        })
    }
}

/// Buffer a response body, giving up once it passes `limit` bytes.
async fn read_body(mut response: reqwest::Response, limit: usize) -> Result<String, ForwardError> {
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(ForwardError::ResponseTooLarge { limit });
    }

    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if buf.len() + chunk.len() > limit {
            return Err(ForwardError::ResponseTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl Forward for RedirectForwarder {
    fn forward(&self, body: Bytes) -> BoxFuture<'_, Result<UpstreamResponse, ForwardError>> {
        Box::pin(self.post(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_statuses() {
        for code in [301, 302, 303, 307, 308] {
            assert!(is_redirect(StatusCode::from_u16(code).unwrap()), "{code}");
        }
        for code in [200, 204, 300, 304, 305, 400, 500] {
            assert!(!is_redirect(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }

    #[test]
    fn test_from_config() {
        let config = UpstreamConfig {
            url: " https://script.example.com/macros/s/abc/exec ".into(),
            ..UpstreamConfig::default()
        };
        let forwarder = RedirectForwarder::from_config(&config).unwrap();
        assert_eq!(
            forwarder.target().as_str(),
            "https://script.example.com/macros/s/abc/exec"
        );
        assert_eq!(forwarder.max_redirects, 3);
        assert_eq!(forwarder.max_response_bytes, 1024 * 1024);
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = UpstreamConfig {
            url: "not a url".into(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(
            RedirectForwarder::from_config(&config),
            Err(SetupError::Url(_))
        ));
    }
}
