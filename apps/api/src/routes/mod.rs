pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matcher::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/jobs", get(handlers::handle_list_jobs))
        // Administrative: rebuild corpus + embedding index from the dataset
        .route("/api/v1/reload", post(handlers::handle_reload))
        .with_state(state)
}
