//! Metrics collection and exposition.
//!
//! # Metrics
//! - `todo_http_requests_total` (counter): requests by method, route, status
//! - `todo_http_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Low-overhead metric updates (no-ops until a recorder is installed)
//! - Labels use route names, not raw paths, to bound cardinality

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();

    metrics::counter!(
        "todo_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "todo_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(elapsed);
}
