pub mod middleware;
pub mod registry;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};

/// Handler for the /metrics endpoint
/// Returns metrics in Prometheus exposition format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", e),
        )
            .into_response();
    }

    let body = String::from_utf8(buffer).unwrap_or_default();
    (
        StatusCode::OK,
        [(CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
        .into_response()
}

pub use registry::{
    ERROR_PAYLOADS_DECODED_TOTAL, ERROR_PAYLOAD_DECODE_FAILURES_TOTAL,
    EXCEPTIONS_RECONSTRUCTED_TOTAL, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS,
    UPSTREAM_ERRORS_TOTAL, UPSTREAM_REQUESTS_TOTAL, VALIDATION_RESPONSES_TOTAL,
};
