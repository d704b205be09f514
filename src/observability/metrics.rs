//! Metrics collection and exposition.
//!
//! # Metrics
//! - `statusd_probes_total` (counter): probes by host, verdict
//! - `statusd_refreshes_total` (counter): fan-out runs
//! - `statusd_refresh_duration_seconds` (histogram): fan-out latency
//! - `statusd_cache_requests_total` (counter): reads by result (hit, joined, refresh)
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::probe::Verdict;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(host: &str, verdict: Verdict) {
    metrics::counter!(
        "statusd_probes_total",
        "host" => host.to_string(),
        "verdict" => verdict.as_str()
    )
    .increment(1);
}

pub fn record_refresh(duration: Duration) {
    metrics::counter!("statusd_refreshes_total").increment(1);
    metrics::histogram!("statusd_refresh_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_cache_request(result: &'static str) {
    metrics::counter!("statusd_cache_requests_total", "result" => result).increment(1);
}
