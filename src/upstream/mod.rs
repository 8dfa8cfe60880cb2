//! Upstream automation backend.
//!
//! # Data Flow
//! ```text
//! validated body
//!     → forwarder.rs (POST, follow redirects with the same body)
//!     → UpstreamResponse (status + text)
//!     → http/response.rs (normalize for the caller)
//! ```

pub mod forwarder;

pub use forwarder::{
    client_builder, is_redirect, Forward, ForwardError, RedirectForwarder, SetupError,
    UpstreamResponse, DEFAULT_MAX_RESPONSE_BYTES, UPSTREAM_CONTENT_TYPE,
};
