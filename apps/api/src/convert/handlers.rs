use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
const NO_FILE: &str = "No file uploaded";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub html: String,
}

/// POST /upload
///
/// Converts the multipart `file` field (a .docx) to HTML.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|_| AppError::Validation(NO_FILE.to_string()))?;

    let payload = read_upload_field(&mut multipart).await?;
    let payload = payload
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation(NO_FILE.to_string()))?;

    info!("Converting uploaded document ({} bytes)", payload.len());

    let converter = state.converter.clone();
    let conversion = tokio::task::spawn_blocking(move || converter.convert(&payload))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in conversion: {e}")))?
        .map_err(|e| AppError::upstream("Failed to convert document", &anyhow::Error::new(e)))?;

    for message in &conversion.messages {
        warn!("Conversion: {message}");
    }

    Ok(Json(UploadResponse {
        html: conversion.html,
    }))
}

/// Returns the bytes of the `file` field, skipping any other fields.
async fn read_upload_field(multipart: &mut Multipart) -> Result<Option<Bytes>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}
