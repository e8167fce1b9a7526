// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::http::{StatusCode, header};
use axum::response::Response;
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};

/// Total number of HTTP requests served, labeled by method, path, and status.
pub static HTTP_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "user_api_http_requests_total",
        "Total number of HTTP requests, labeled by method, path, and status",
        &["method", "path", "status"]
    )
    .expect("Failed to create user_api_http_requests_total counter vec")
});

/// Histogram for HTTP request durations in seconds.
pub static HTTP_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "user_api_http_request_duration_seconds",
        "HTTP request durations in seconds",
        &["method", "path"],
        vec![0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to create HTTP request duration histogram")
});

/// Record a served request
///
/// # Arguments
/// * `method` - HTTP method of the request
/// * `path` - Matched route path
/// * `status` - Status code of the response
/// * `duration_secs` - Time spent serving the request in seconds
pub fn observe_request(method: &str, path: &str, status: StatusCode, duration_secs: f64) {
    HTTP_REQUESTS
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Axum handler that exports metrics in Prometheus text format
///
/// # Panics
///
/// This function will panic if:
/// - The metrics encoder fails to encode the metrics data
/// - The UTF-8 conversion of the encoded buffer fails
/// - The HTTP response builder fails to create the response
pub async fn metrics_handler() -> Response<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(String::from_utf8(buffer).expect("metrics buffer should be valid UTF-8"))
        .expect("Failed to create metrics response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_request_accepts_all_statuses() {
        observe_request("GET", "/v1/me", StatusCode::OK, 0.003);
        observe_request("GET", "/v1/me", StatusCode::NOT_FOUND, 0.001);
        observe_request("PUT", "/v1/me", StatusCode::FORBIDDEN, 0.002);

        let served = HTTP_REQUESTS
            .with_label_values(&["GET", "/v1/me", "200"])
            .get();
        assert!(served >= 1);
    }

    #[tokio::test]
    async fn metrics_handler_exports_text_format() {
        observe_request("GET", "/health", StatusCode::OK, 0.001);

        let response = metrics_handler().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().contains("user_api_http_requests_total"));
    }
}
