//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    check_promotion, get_average, get_best_performing, get_summary, get_time_slots, health, submit_performance,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_span};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let analytics_routes = Router::new()
        .route("/analytics/summary", get(get_summary))
        .route("/analytics/best", get(get_best_performing))
        .route("/analytics/time-slots", get(get_time_slots))
        .route("/analytics/average", get(get_average))
        .route("/analytics/performance", post(submit_performance))
        .route("/analytics/promotion-check", post(check_promotion));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", analytics_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
