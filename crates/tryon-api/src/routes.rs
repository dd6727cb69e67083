//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    analyze, cancel, clear_image, confirm, get_preview, get_result, get_workflow, health, regenerate,
    reset, select_image, toggle_item,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let image_routes = Router::new()
        .route("/images/:role", put(select_image).delete(clear_image))
        .route("/previews/:id", get(get_preview));

    let workflow_routes = Router::new()
        .route("/workflow", get(get_workflow))
        .route("/workflow/analyze", post(analyze))
        .route("/workflow/items/toggle", post(toggle_item))
        .route("/workflow/confirm", post(confirm))
        .route("/workflow/regenerate", post(regenerate))
        .route("/workflow/cancel", post(cancel))
        .route("/workflow/reset", post(reset))
        .route("/workflow/result", get(get_result));

    let api_routes = Router::new().merge(image_routes).merge(workflow_routes);

    let health_routes = Router::new().route("/health", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Image uploads are bounded by MAX_BODY_SIZE rather than axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
