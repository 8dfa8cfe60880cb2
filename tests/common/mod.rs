//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Router,
};
use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

use form_relay::config::{RelayConfig, UpstreamConfig};
use form_relay::upstream::{
    client_builder, Forward, ForwardError, RedirectForwarder, UpstreamResponse,
};

/// One scripted upstream answer.
#[derive(Debug, Clone)]
pub enum Step {
    /// Redirect to a path on the mock itself (sent as an absolute URL).
    Redirect { status: u16, path: &'static str },
    /// Redirect with a literal `Location` value.
    RedirectRaw { status: u16, location: &'static str },
    /// Redirect with a `Location` that is not valid UTF-8.
    RedirectBytes { status: u16, location: &'static [u8] },
    /// Redirect without any `Location` header.
    RedirectWithoutLocation { status: u16 },
    /// Final answer.
    Respond { status: u16, body: &'static str },
    /// Never answer within any test's patience.
    Stall,
}

/// A request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: Bytes,
}

struct MockState {
    base: String,
    steps: Vec<Step>,
    delay: Duration,
    next: AtomicUsize,
    received: Mutex<Vec<Received>>,
}

/// Scripted upstream bound on an ephemeral port.
///
/// Requests consume steps in order; once the script runs out the last step
/// repeats.
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn start(steps: Vec<Step>) -> Self {
        Self::start_delayed(steps, Duration::ZERO).await
    }

    /// Like `start`, but every answer waits `delay` first.
    pub async fn start_delayed(steps: Vec<Step>, delay: Duration) -> Self {
        assert!(!steps.is_empty(), "mock upstream needs at least one step");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(MockState {
            base: format!("http://{addr}"),
            steps,
            delay,
            next: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(mock_handler).with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.state.base, path)
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }
}

async fn mock_handler(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.received.lock().unwrap().push(Received {
        method,
        path: uri.path().to_string(),
        content_type: header_str(&headers, header::CONTENT_TYPE),
        accept: header_str(&headers, header::ACCEPT),
        body,
    });

    let index = state.next.fetch_add(1, Ordering::SeqCst);
    let step = state.steps[index.min(state.steps.len() - 1)].clone();

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let builder = Response::builder();
    let response = match step {
        Step::Redirect { status, path } => builder
            .status(status)
            .header(header::LOCATION, format!("{}{}", state.base, path))
            .body(Body::empty()),
        Step::RedirectRaw { status, location } => builder
            .status(status)
            .header(header::LOCATION, location)
            .body(Body::empty()),
        Step::RedirectBytes { status, location } => builder
            .status(status)
            .header(
                header::LOCATION,
                header::HeaderValue::from_bytes(location).unwrap(),
            )
            .body(Body::empty()),
        Step::RedirectWithoutLocation { status } => builder.status(status).body(Body::empty()),
        Step::Respond { status, body } => builder.status(status).body(Body::from(body)),
        Step::Stall => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            builder.status(504).body(Body::empty())
        }
    };
    response.unwrap()
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// HTTP client configured the way the relay needs it, minus system proxies.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Forwarder pointed at `url` with the default hop bound.
pub fn forwarder_to(url: &str) -> RedirectForwarder {
    RedirectForwarder::with_client(test_client(), Url::parse(url).unwrap(), 3)
}

/// Forwarder built from `config` (timeouts and limits included), minus
/// system proxies.
pub fn configured_forwarder(config: &UpstreamConfig) -> RedirectForwarder {
    let client = client_builder(config).no_proxy().build().unwrap();
    RedirectForwarder::with_client(client, Url::parse(&config.url).unwrap(), config.max_redirects)
        .max_response_bytes(config.max_response_bytes)
}

/// Default configuration pointed at `upstream`.
pub fn test_config(upstream: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.upstream.url = upstream.to_string();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}

/// Forwarder double that records bodies and answers with a fixed response.
pub struct SpyForwarder {
    calls: AtomicUsize,
    bodies: Mutex<Vec<Bytes>>,
    status: StatusCode,
    body: String,
}

impl SpyForwarder {
    pub fn answering(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            bodies: Mutex::new(Vec::new()),
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Bytes> {
        self.bodies.lock().unwrap().clone()
    }
}

impl Forward for SpyForwarder {
    fn forward(&self, body: Bytes) -> BoxFuture<'_, Result<UpstreamResponse, ForwardError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push(body);
        let response = UpstreamResponse {
            status: self.status,
            body: self.body.clone(),
            hops: 0,
        };
        Box::pin(async move { Ok(response) })
    }
}

/// A decoded endpoint response.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Send one request through the router in-process.
pub async fn send(
    router: &Router,
    method: Method,
    origin: Option<&str>,
    body: impl Into<Body>,
) -> Reply {
    let mut request = axum::http::Request::builder()
        .method(method)
        .uri("/api/submit")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(origin) = origin {
        request = request.header(header::ORIGIN, origin);
    }

    let response = router
        .clone()
        .oneshot(request.body(body.into()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();

    Reply {
        status,
        headers,
        body,
    }
}
