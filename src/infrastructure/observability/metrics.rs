//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::route::RouteSource;

const MAX_PATH_LABEL_LEN: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("bus_route_resolver_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one provider resolution and how it ended
pub fn record_route_resolution(provider: &'static str, source: RouteSource, duration: Duration) {
    let labels = [("provider", provider), ("source", source.as_str())];

    counter!("route_resolutions_total", &labels).increment(1);
    histogram!("route_resolution_duration_seconds", &labels).record(duration.as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("route_cache_lookups_total", "result" => result).increment(1);
}

/// Queued request answered by a segment cached earlier in the same drain
pub fn record_queue_dedup() {
    counter!("route_queue_dedup_total").increment(1);
}

pub fn record_cache_evictions(count: usize) {
    counter!("route_cache_evictions_total").increment(count as u64);
}

/// Requests waiting for the throttler
pub fn set_queue_depth(depth: usize) {
    gauge!("route_queue_depth").set(depth as f64);
}

/// Limit label cardinality for unmatched paths
fn sanitize_path(path: &str) -> String {
    match path.char_indices().nth(MAX_PATH_LABEL_LEN) {
        Some((end, _)) => path[..end].to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_keeps_route_pattern() {
        assert_eq!(sanitize_path("/v1/route"), "/v1/route");
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        let sanitized = sanitize_path(path);
        assert_eq!(sanitized.len(), MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_route_resolution("osrm", RouteSource::Fallback, Duration::from_millis(12));
        record_cache_lookup(true);
        record_queue_dedup();
        record_cache_evictions(3);
        set_queue_depth(0);
    }
}
