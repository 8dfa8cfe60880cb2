//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_submissions_total` (counter): submissions by outcome and status
//! - `relay_request_duration_seconds` (histogram): end-to-end handler latency
//! - `relay_upstream_hops` (histogram): redirects followed per forwarded submission
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! deployments without the endpoint pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled submission request.
pub fn record_submission(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_submissions_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record how many redirects a forward needed.
pub fn record_hops(hops: u32) {
    metrics::histogram!("relay_upstream_hops").record(f64::from(hops));
}
