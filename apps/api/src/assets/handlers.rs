use axum::{extract::State, Json};
use serde_json::Value;

use crate::assets::icons::IconMap;
use crate::assets::resume_data::{load_resume_data, ResumeDataError};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /get-icons-png
///
/// The icon map built at startup. Never fails; may be empty.
pub async fn handle_get_icons(State(state): State<AppState>) -> Json<IconMap> {
    Json(state.icons.as_ref().clone())
}

/// GET /get-data
///
/// The static resume JSON, unmodified.
pub async fn handle_get_data(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let path = &state.config.resume_data_path;
    match load_resume_data(path).await {
        Ok(data) => Ok(Json(data)),
        Err(ResumeDataError::NotFound(path)) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Err(AppError::NotFound(format!("{file_name} not found.")))
        }
        Err(ResumeDataError::Decode { path, source }) => {
            tracing::error!("Resume data {} is not valid JSON: {source}", path.display());
            Err(AppError::Decode("Error reading JSON data.".to_string()))
        }
        Err(e) => Err(AppError::Internal(e.into())),
    }
}
