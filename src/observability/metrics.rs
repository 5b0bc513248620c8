//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status
//! - `router_request_duration_seconds` (histogram): latency by method
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder the calls are no-ops
//! - The Prometheus exporter is only installed when enabled in config
//! - The `method` label is one of the known methods or `OTHER`, so clients
//!   cannot grow the series set with made-up methods

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Method;

/// Label value for methods outside the known set.
pub const OTHER_METHOD: &str = "OTHER";

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Map a request method onto a bounded label value.
pub fn method_label(method: &str) -> &'static str {
    method
        .parse::<Method>()
        .map(|m| m.as_str())
        .unwrap_or(OTHER_METHOD)
}

/// Record one served request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    let method = method_label(method);

    counter!(
        "router_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "router_request_duration_seconds",
        "method" => method
    )
    .record(elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_request("GET", 200, Instant::now());
        record_request("BREW", 404, Instant::now());
    }

    #[test]
    fn known_methods_keep_their_label() {
        for method in Method::ALL {
            assert_eq!(method_label(method.as_str()), method.as_str());
        }
        assert_eq!(method_label("get"), OTHER_METHOD);
        assert_eq!(method_label("BREW"), OTHER_METHOD);
    }

    #[test]
    fn unknown_methods_share_one_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            for i in 0..50 {
                record_request(&format!("X{i}"), 404, Instant::now());
            }
            record_request("GET", 200, Instant::now());
        });

        let rendered = handle.render();
        let series: Vec<_> = rendered
            .lines()
            .filter(|line| line.starts_with("router_requests_total{"))
            .collect();

        assert_eq!(series.len(), 2, "{rendered}");
        assert!(series.iter().any(|line| line.contains(r#"method="OTHER""#) && line.ends_with(" 50")));
        assert!(series.iter().any(|line| line.contains(r#"method="GET""#)));
    }
}
