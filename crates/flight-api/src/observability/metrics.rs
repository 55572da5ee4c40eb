//! Metrics definitions for the flight API.
//!
//! All metrics follow Prometheus naming conventions:
//! - `api_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: HTTP methods
//! - `endpoint`: the known routes plus `/other`
//! - `status`: 3 values (success, error, timeout)
//! - `outcome`: `success` or one of the rejection kinds
//! - JWKS/userinfo `status`: bounded by error variants

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Histogram buckets for inbound HTTP requests.
const HTTP_REQUEST_BUCKETS: &[f64] = &[
    0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
];

/// Histogram buckets for outbound identity-provider calls (10s timeout).
const IDP_REQUEST_BUCKETS: &[f64] = &[
    0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
];

/// Build the Prometheus recorder configuration.
fn prometheus_builder() -> Result<PrometheusBuilder, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("api_http_request".to_string()),
            HTTP_REQUEST_BUCKETS,
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("api_jwks_fetch".to_string()),
            IDP_REQUEST_BUCKETS,
        )
        .map_err(|e| format!("Failed to set JWKS fetch buckets: {e}"))
}

/// Install the Prometheus recorder globally and return the handle used to
/// render `/metrics`.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    prometheus_builder()?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Build a Prometheus handle without installing it globally.
///
/// Used where several routers are built in one process (tests).
pub fn detached_metrics_handle() -> Result<PrometheusHandle, String> {
    Ok(prometheus_builder()?.build_recorder().handle())
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `api_http_requests_total`, `api_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
///
/// Captures every response, including 401 rejections and 404s.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("api_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("api_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto a bounded set of endpoint labels.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/verify" => "/verify",
        "/flights" => "/flights",
        "/flights/search" => "/flights/search",
        _ => "/other",
    }
}

// ============================================================================
// Authentication Metrics
// ============================================================================

/// Record the outcome of one auth gate decision
///
/// Metric: `api_token_validations_total`
/// Labels: `outcome` (`success` or an `AuthRejection::kind()` value)
pub fn record_token_validation(outcome: &'static str) {
    counter!("api_token_validations_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one key-discovery fetch
///
/// Metric: `api_jwks_fetches_total`, `api_jwks_fetch_duration_seconds`
/// Labels: `status` (`success`, `request_error`, `bad_status`, `invalid_body`)
pub fn record_jwks_fetch(status: &'static str, duration: Duration) {
    histogram!("api_jwks_fetch_duration_seconds",
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("api_jwks_fetches_total",
        "status" => status
    )
    .increment(1);
}

/// Record one profile lookup
///
/// Metric: `api_userinfo_requests_total`
/// Labels: `status` (`success`, `request_error`, `bad_status`, `invalid_body`)
pub fn record_userinfo_request(status: &'static str) {
    counter!("api_userinfo_requests_total",
        "status" => status
    )
    .increment(1);
}
