pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::quotes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/generate", post(handlers::handle_generate))
        .route("/api/presets", get(handlers::handle_presets))
        .route("/api/export", post(handlers::handle_export))
        .with_state(state)
}
