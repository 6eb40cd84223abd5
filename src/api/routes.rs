use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{create_item, get_item, health, AppState};
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Item endpoints
        .route("/items", post(create_item))
        .route("/items/:id", get(get_item))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // Add middleware (order matters: metrics -> trace)
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
