// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, ECHO_RETRIES, GENERATION_REQUESTS, MODEL_CALLS, MODEL_CALL_DURATION, UPLOADS,
};

/// Helper to record the outcome of a generation request
pub fn record_generation(mode: &str, outcome: &str) {
    GENERATION_REQUESTS.with_label_values(&[mode, outcome]).inc();
}

/// Helper to record an echo-triggered retry
pub fn record_echo_retry() {
    ECHO_RETRIES.with_label_values(&["first_attempt"]).inc();
}

/// Helper to record Gemini API call metrics
pub fn record_model_call(status: &str, duration_secs: f64) {
    MODEL_CALLS.with_label_values(&[status]).inc();
    MODEL_CALL_DURATION
        .with_label_values(&[status])
        .observe(duration_secs);
}

pub fn record_upload(kind: &str) {
    UPLOADS.with_label_values(&[kind]).inc();
}
