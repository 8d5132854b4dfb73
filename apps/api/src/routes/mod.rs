pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analyze::handlers::handle_analyze;
use crate::assets::handlers::{handle_get_data, handle_get_icons};
use crate::convert::handlers::handle_upload;
use crate::state::AppState;
use crate::style::handlers::{handle_load_style, handle_save_style};

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/upload", post(handle_upload))
        .route("/get-icons-png", get(handle_get_icons))
        .route("/get-data", get(handle_get_data))
        .route("/save-style", post(handle_save_style))
        .route("/load-style", get(handle_load_style))
        .route("/analyze", post(handle_analyze))
        .layer(body_limit)
        .with_state(state)
}
