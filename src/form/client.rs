//! HTTP client that delivers prepared submissions.
//!
//! Two destinations exist. The proxy endpoint (`/api/submit`) answers with a
//! normalized `{ok, ...}` body and success is judged by that `ok` field. The
//! hosted form relay is called directly and success is its HTTP status.

use std::time::Duration;

use reqwest::header::{ACCEPT, ORIGIN};
use serde_json::Value;
use url::Url;

use crate::form::fields::Fields;

/// Default base URL of the hosted form relay; the recipient address is
/// appended.
pub const FORM_RELAY_BASE: &str = "https://formsubmit.co/ajax/";

/// Where a submission is sent.
#[derive(Debug, Clone)]
pub enum Destination {
    /// The origin-gated forwarding endpoint.
    Proxy { endpoint: Url, origin: String },
    /// A hosted form relay at `base`, delivering to `email`.
    ///
    /// `base` should end in `/` so the address is appended, not substituted.
    FormRelay { base: Url, email: String },
}

impl Destination {
    /// The hosted form relay at its public address.
    pub fn form_relay(email: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Destination::FormRelay {
            base: Url::parse(FORM_RELAY_BASE)?,
            email: email.into(),
        })
    }

    pub fn url(&self) -> Result<Url, url::ParseError> {
        match self {
            Destination::Proxy { endpoint, .. } => Ok(endpoint.clone()),
            Destination::FormRelay { base, email } => base.join(email),
        }
    }
}

/// How a send attempt ended, as shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the backend.
    Sent,
    /// Reached the backend, which did not accept it.
    Rejected,
    /// Never got an answer.
    Unreachable,
}

impl SubmitOutcome {
    pub fn is_success(self) -> bool {
        self == SubmitOutcome::Sent
    }

    pub fn message(self) -> &'static str {
        match self {
            SubmitOutcome::Sent => "Takk! Vi tar kontakt snart.",
            SubmitOutcome::Rejected => "Noe gikk galt. Prøv igjen eller send e-post direkte.",
            SubmitOutcome::Unreachable => "Kunne ikke sende. Sjekk internett-tilkoblingen.",
        }
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Sends prepared submissions to one destination.
#[derive(Debug, Clone)]
pub struct FormClient {
    client: reqwest::Client,
    destination: Destination,
}

impl FormClient {
    pub fn new(destination: Destination) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self::with_client(client, destination))
    }

    pub fn with_client(client: reqwest::Client, destination: Destination) -> Self {
        Self {
            client,
            destination,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// POST the payload as JSON and classify the answer.
    pub async fn send(&self, payload: &Fields) -> SubmitOutcome {
        let url = match self.destination.url() {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, "Invalid submission destination");
                return SubmitOutcome::Unreachable;
            }
        };

        let mut request = self.client.post(url).json(payload);
        match &self.destination {
            Destination::Proxy { origin, .. } => request = request.header(ORIGIN, origin),
            Destination::FormRelay { .. } => request = request.header(ACCEPT, "application/json"),
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Submission request failed");
                return SubmitOutcome::Unreachable;
            }
        };

        let status = response.status();
        match self.destination {
            Destination::FormRelay { .. } => {
                if status.is_success() {
                    SubmitOutcome::Sent
                } else {
                    tracing::warn!(status = %status, "Form relay rejected submission");
                    SubmitOutcome::Rejected
                }
            }
            Destination::Proxy { .. } => match response.json::<Value>().await {
                Ok(body) if body.get("ok").is_some_and(is_truthy) => SubmitOutcome::Sent,
                Ok(body) => {
                    tracing::warn!(status = %status, body = %body, "Relay reported failure");
                    SubmitOutcome::Rejected
                }
                Err(e) => {
                    tracing::warn!(status = %status, error = %e, "Relay answer was not JSON");
                    SubmitOutcome::Rejected
                }
            },
        }
    }
}
