//! Workflow metrics.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const ANALYSIS_REQUESTS_TOTAL: &str = "tryon_analysis_requests_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "tryon_analysis_duration_seconds";
    pub const SYNTHESIS_REQUESTS_TOTAL: &str = "tryon_synthesis_requests_total";
    pub const SYNTHESIS_DURATION_SECONDS: &str = "tryon_synthesis_duration_seconds";
    pub const STALE_RESPONSES_TOTAL: &str = "tryon_stale_responses_total";
    pub const IMAGES_SELECTED_TOTAL: &str = "tryon_images_selected_total";
}

/// Record a finished analysis call.
pub fn record_analysis(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::ANALYSIS_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS).record(duration_secs);
}

/// Record a finished synthesis call.
pub fn record_synthesis(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::SYNTHESIS_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::SYNTHESIS_DURATION_SECONDS).record(duration_secs);
}

/// Record a response discarded because the workflow moved on.
pub fn record_stale_response(operation: &str) {
    let labels = [("operation", operation.to_string())];
    counter!(names::STALE_RESPONSES_TOTAL, &labels).increment(1);
}

/// Record an image placed into a slot.
pub fn record_image_selected(role: &str, source: &str) {
    let labels = [("role", role.to_string()), ("source", source.to_string())];
    counter!(names::IMAGES_SELECTED_TOTAL, &labels).increment(1);
}
