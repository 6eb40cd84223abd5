use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Error payload decoding
    pub static ref ERROR_PAYLOADS_DECODED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "error_payloads_decoded_total",
        "Total error payloads decoded",
        &["format"]  // format: json, xml
    )
    .unwrap();

    pub static ref ERROR_PAYLOAD_DECODE_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "error_payload_decode_failures_total",
        "Total error payloads that could not be decoded",
        &["reason"]
    )
    .unwrap();

    // Exception reconstruction
    pub static ref EXCEPTIONS_RECONSTRUCTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "exceptions_reconstructed_total",
        "Total reconstruction outcomes",
        &["tier"]  // tier: generic, response, message, supertype, fatal
    )
    .unwrap();

    // Upstream calls made through the error-mapping client
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "upstream_requests_total",
        "Total requests sent by the error-mapping client",
        &["method"]
    )
    .unwrap();

    pub static ref UPSTREAM_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "upstream_errors_total",
        "Total non-success responses received by the error-mapping client",
        &["status_code"]
    )
    .unwrap();

    // Validation
    pub static ref VALIDATION_RESPONSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "validation_responses_total",
        "Total validation failures rendered as 400 responses",
        &["format"]
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&ERROR_PAYLOADS_DECODED_TOTAL);
    lazy_static::initialize(&ERROR_PAYLOAD_DECODE_FAILURES_TOTAL);
    lazy_static::initialize(&EXCEPTIONS_RECONSTRUCTED_TOTAL);
    lazy_static::initialize(&UPSTREAM_REQUESTS_TOTAL);
    lazy_static::initialize(&UPSTREAM_ERRORS_TOTAL);
    lazy_static::initialize(&VALIDATION_RESPONSES_TOTAL);
}
