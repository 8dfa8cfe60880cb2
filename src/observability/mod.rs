//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and forwarder produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Upstream failure detail is only ever logged, never returned

pub mod logging;
pub mod metrics;
