pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ingest::handlers::handle_upload;
use crate::matching::handlers::handle_match;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Upload mode
        .route("/api/v1/resumes", post(handle_upload))
        // Match mode
        .route("/api/v1/match", post(handle_match))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
