pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::portfolio::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Portfolio API
        .route("/api/v1/portfolio", post(handlers::handle_generate))
        .route(
            "/api/v1/portfolio/archive",
            get(handlers::handle_latest_archive),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
