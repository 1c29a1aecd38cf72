pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV Analysis API
        .route("/api/v1/cv/analyze", post(handlers::handle_analyze))
        .route("/api/v1/cv/feedback", post(handlers::handle_feedback))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
