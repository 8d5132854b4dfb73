use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::style::StyleConfig;
use crate::state::AppState;
use crate::style::store::StoreError;

#[derive(Debug, Serialize)]
pub struct SaveStyleResponse {
    pub message: String,
}

/// POST /save-style
///
/// Any subset of the six fields; the rest take their defaults.
pub async fn handle_save_style(
    State(state): State<AppState>,
    body: Result<Json<StyleConfig>, JsonRejection>,
) -> Result<Json<SaveStyleResponse>, AppError> {
    let Json(config) = body.map_err(|e| {
        AppError::upstream("Failed to save style", &anyhow::anyhow!(e.body_text()))
    })?;

    state
        .styles
        .save(&config)
        .await
        .map_err(|e| AppError::upstream("Failed to save style", &anyhow::Error::new(e)))?;

    Ok(Json(SaveStyleResponse {
        message: "Default styles saved successfully.".to_string(),
    }))
}

/// GET /load-style
pub async fn handle_load_style(
    State(state): State<AppState>,
) -> Result<Json<StyleConfig>, AppError> {
    match state.styles.load().await {
        Ok(config) => Ok(Json(config)),
        Err(StoreError::Decode { path, source }) => {
            tracing::error!("Style file {} is not valid JSON: {source}", path.display());
            Err(AppError::Decode("Error reading style JSON.".to_string()))
        }
        Err(e) => Err(AppError::Internal(e.into())),
    }
}
