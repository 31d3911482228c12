pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Conversation phase
        .route("/api/start_session", get(chat::handle_start_session))
        .route("/api/chat", post(chat::handle_chat))
        // Profile phase
        .route("/api/generate_profile", post(profile::handle_generate_profile))
        .route("/report", get(profile::handle_report))
        .with_state(state)
}
