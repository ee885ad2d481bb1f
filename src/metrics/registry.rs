// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // GENERATION METRICS
    // ============================================================================

    /// Generation requests by mode and outcome
    pub static ref GENERATION_REQUESTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("generation_requests_total", "Total generation requests"),
        &["mode", "outcome"], // outcome: accepted or an error kind
        REGISTRY
    ).unwrap();

    /// Retries triggered by an echoed input
    pub static ref ECHO_RETRIES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("echo_retries_total", "Retries triggered by an echoed input image"),
        &["stage"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // GEMINI API METRICS
    // ============================================================================

    /// Total Gemini API calls
    pub static ref MODEL_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("model_calls_total", "Total Gemini API calls"),
        &["status"],
        REGISTRY
    ).unwrap();

    /// Gemini API call duration
    pub static ref MODEL_CALL_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("model_call_duration_seconds", "Gemini API call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        &["status"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // UPLOAD METRICS
    // ============================================================================

    /// Stored uploads
    pub static ref UPLOADS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("uploads_total", "Total stored uploads"),
        &["kind"], // kind: subject, reference
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
