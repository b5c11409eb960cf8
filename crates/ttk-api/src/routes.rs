//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::handlers::{create_project, get_project, health, list_projects, ready, try_for_free};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    burst_limit_middleware, cors_layer, gate_middleware, request_id, request_logging,
    security_headers, BurstLimiter,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let burst_limiter = Arc::new(BurstLimiter::new(
        state.config.rate_limit_rps,
        state.config.rate_limit_burst,
    ));

    // Innermost layer runs last: burst limit, then quota gate (POST only), then handler
    let api_routes = Router::new()
        .route("/try", post(try_for_free))
        .route("/projects", post(create_project).get(list_projects))
        .route("/projects/:id", get(get_project))
        .layer(middleware::from_fn_with_state(state.clone(), gate_middleware))
        .layer(middleware::from_fn_with_state(
            burst_limiter,
            burst_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
