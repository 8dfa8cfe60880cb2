//! Origin-gated form submission relay.
//!
//! Receives JSON form submissions from the marketing site, checks the
//! caller's origin and the payload, forwards the body unchanged to a single
//! automation backend (following its redirects without losing the POST
//! body) and relays a normalized `{ok, ...}` answer.
//!
//! The `form` and `ui` modules model the page side: collecting and
//! validating form fields, sending them, and the page's interaction state.

pub mod config;
pub mod form;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod ui;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
