use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::analyze::rewrite::rewrite_resume;
use crate::errors::AppError;
use crate::models::rewrite::RewriteResult;
use crate::state::AppState;

const MISSING_INPUT: &str = "Missing resume or JD";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_html: Option<String>,
    pub job_description: Option<String>,
}

/// POST /analyze
///
/// Rewrites the resume HTML against the job description and returns the
/// annotated HTML with its phrase mappings. Input is checked before any
/// model call is made.
pub async fn handle_analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<RewriteResult>, AppError> {
    let Json(request) = body.map_err(|_| AppError::Validation(MISSING_INPUT.to_string()))?;

    let (resume_html, job_description) = match (
        non_empty(request.resume_html),
        non_empty(request.job_description),
    ) {
        (Some(html), Some(jd)) => (html, jd),
        _ => return Err(AppError::Validation(MISSING_INPUT.to_string())),
    };

    let result = rewrite_resume(state.model.as_ref(), &resume_html, &job_description)
        .await
        .map_err(|e| AppError::upstream_with_stack("Server Error", &e))?;

    Ok(Json(result))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
