//! Prometheus Metrics Definitions
//!
//! Registered once in the default registry and exposed on `GET /metrics`.

use axum::{http::StatusCode, response::IntoResponse};
use funfact_core::LookupOutcome;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_counter, CounterVec, Encoder,
    HistogramVec, IntCounter, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms up to 30s. Generation calls sit in the upper half.
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Global metrics instance - initialized on first use
pub static METRICS: Lazy<ApiResult<FunFactMetrics>> = Lazy::new(FunFactMetrics::new);

/// The registered metrics, or `None` if registration failed.
pub fn metrics() -> Option<&'static FunFactMetrics> {
    METRICS.as_ref().ok()
}

/// Container for all service metrics.
#[derive(Clone)]
pub struct FunFactMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Fact lookups by resolution outcome - labels: outcome
    pub lookups_total: CounterVec,

    /// Lookups that ended in a generation or storage error
    pub generation_failures_total: IntCounter,
}

impl FunFactMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "funfact_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "funfact_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            lookups_total: register_counter_vec!(
                "funfact_lookups_total",
                "Fact lookups by outcome",
                &["outcome"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register lookups_total: {}", e)))?,

            generation_failures_total: register_int_counter!(
                "funfact_generation_failures_total",
                "Fact lookups that failed with an error"
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register generation_failures_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record which branch served a lookup.
    pub fn record_lookup(&self, outcome: LookupOutcome) {
        self.lookups_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_generation_failure(&self) {
        self.generation_failures_total.inc();
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    // Make sure our families exist even before the first request.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
