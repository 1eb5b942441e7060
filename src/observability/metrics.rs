//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by operation, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency by operation
//! - `gateway_upstream_calls_total` (counter): downstream calls by operation, outcome
//! - `gateway_upstream_duration_seconds` (histogram): downstream latency by operation, outcome
//! - `gateway_errors_total` (counter): reported errors by kind
//!
//! # Design Decisions
//! - Recording is a no-op until [`init_metrics`] installs the exporter
//! - Labels are static strings only; user ids never become labels

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    ::metrics::describe_counter!("gateway_requests_total", "Inbound requests handled");
    ::metrics::describe_histogram!(
        "gateway_request_duration_seconds",
        "Inbound request latency"
    );
    ::metrics::describe_counter!("gateway_upstream_calls_total", "Downstream calls issued");
    ::metrics::describe_histogram!(
        "gateway_upstream_duration_seconds",
        "Downstream call latency"
    );
    ::metrics::describe_counter!("gateway_errors_total", "Errors reported to callers");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed inbound request.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record one downstream call and how it ended.
pub fn record_upstream_call(operation: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!(
        "gateway_upstream_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "gateway_upstream_duration_seconds",
        "operation" => operation,
        "outcome" => outcome
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_error(kind: &'static str) {
    ::metrics::counter!("gateway_errors_total", "kind" => kind).increment(1);
}
