//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;

/// Install the Prometheus recorder and return its render handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "ttk_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "ttk_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "ttk_http_requests_in_flight";

    // Pipeline metrics
    pub const GENERATIONS_TOTAL: &str = "ttk_generations_total";
    pub const PROJECTS_CREATED_TOTAL: &str = "ttk_projects_created_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "ttk_rate_limit_hits_total";
}

static PROJECT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/projects/[A-Za-z0-9_-]+").expect("static path pattern is valid")
});

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a completed generation.
pub fn record_generation(flow: &str, transcript_source: &str) {
    let labels = [
        ("flow", flow.to_string()),
        ("transcript_source", transcript_source.to_string()),
    ];
    counter!(names::GENERATIONS_TOTAL, &labels).increment(1);
}

/// Record a persisted project.
pub fn record_project_created() {
    counter!(names::PROJECTS_CREATED_TOTAL).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(policy: &str) {
    let labels = [("policy", policy.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse ids so paths stay low-cardinality.
fn sanitize_path(path: &str) -> String {
    PROJECT_ID_RE
        .replace_all(path, "/projects/:id")
        .into_owned()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
