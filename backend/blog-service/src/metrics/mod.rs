//! Prometheus metrics for blog-service.
//!
//! Collectors live in the default registry and are rendered by the
//! `/metrics` handler.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Policy checks by check name (view_post, modify_post, modify_comment) and outcome.
    pub static ref POLICY_DECISIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_policy_decisions_total",
        "Visibility and ownership decisions segmented by check and outcome",
        &["check", "outcome"]
    )
    .expect("failed to register blog_policy_decisions_total");

    /// Successful writes by entity (post, comment, user) and action.
    pub static ref CONTENT_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_content_writes_total",
        "Content writes segmented by entity and action",
        &["entity", "action"]
    )
    .expect("failed to register blog_content_writes_total");

    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_http_requests_total",
        "HTTP requests segmented by method and status",
        &["method", "status"]
    )
    .expect("failed to register blog_http_requests_total");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "blog_http_request_duration_seconds",
        "HTTP request duration segmented by method",
        &["method"]
    )
    .expect("failed to register blog_http_request_duration_seconds");
}

pub fn record_write(entity: &str, action: &str) {
    CONTENT_WRITES_TOTAL
        .with_label_values(&[entity, action])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
