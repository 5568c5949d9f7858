use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{analyze_handler, health_handler};
use super::server::{AppState, SharedPipeline};

/// `POST /api/analyze` and `GET /api/health`, with the whole request body
/// capped at `max_body_size` bytes.
pub fn build_router(pipeline: SharedPipeline, max_body_size: usize) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
