pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assistant API
        .route("/api/ai/chat", post(assistant::handle_chat))
        .route(
            "/api/ai/chat/history",
            delete(assistant::handle_clear_history),
        )
        // Matching API
        .route("/api/jobs/rank", post(matching::handle_rank_jobs))
        .with_state(state)
}
