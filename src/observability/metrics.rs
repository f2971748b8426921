//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watchlist_requests_total` (counter): requests by action, status
//! - `watchlist_request_duration_seconds` (histogram): latency by action
//! - `watchlist_store_calls_total` (counter): store calls by operation, outcome
//! - `watchlist_store_call_duration_seconds` (histogram): store latency by operation
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! deployments without `metrics_enabled` pay nothing.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled gateway request.
pub fn record_request(action: &'static str, status: u16, start: Instant) {
    counter!(
        "watchlist_requests_total",
        "action" => action,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("watchlist_request_duration_seconds", "action" => action)
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call to the document store.
pub fn record_store_call(operation: &'static str, success: bool, start: Instant) {
    let outcome = if success { "ok" } else { "error" };
    counter!(
        "watchlist_store_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("watchlist_store_call_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}
