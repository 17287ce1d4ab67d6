pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::ranking::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ranking API
        .route("/api/v1/rank", post(handlers::handle_rank))
        // Single-resume tooling
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        .route("/api/v1/resumes/enhance", post(handlers::handle_enhance))
        .with_state(state)
}
