//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rest_requests_total` (counter): requests by method, status, resource
//! - `rest_request_duration_seconds` (histogram): latency distribution
//! - `rest_routes` (gauge): listener entries in the route table
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished REST request.
pub fn record_request(method: &str, status: u16, resource: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("resource", resource.to_string()),
    ];
    metrics::counter!("rest_requests_total", &labels).increment(1);
    metrics::histogram!("rest_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the route table once it is built.
pub fn record_route_table(routes: usize) {
    metrics::gauge!("rest_routes").set(routes as f64);
}
