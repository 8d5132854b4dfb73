//! Rewrite Orchestrator: resume HTML and job description in, annotated HTML out.
//!
//! Steps: build prompt → model call (JSON requested) → strip code fences → parse.
//! A failure at any step discards the whole operation. No retries.

use anyhow::{Context, Result};
use tracing::info;

use crate::analyze::prompts::build_rewrite_prompt;
use crate::llm_client::{strip_json_fences, GenerativeModel};
use crate::models::rewrite::RewriteResult;

pub async fn rewrite_resume(
    model: &dyn GenerativeModel,
    resume_html: &str,
    job_description: &str,
) -> Result<RewriteResult> {
    let prompt = build_rewrite_prompt(resume_html, job_description);

    let raw = model
        .generate_json(&prompt)
        .await
        .context("Generative model call failed")?;

    let result = parse_rewrite_response(&raw)?;

    info!(
        "Rewrite complete: {} bytes of html, {} mappings",
        result.html.len(),
        result.mappings.len()
    );
    Ok(result)
}

/// Parses model output into a `RewriteResult`.
///
/// Surrounding code fences are removed first. Anything that is not an object
/// with a string `html` and a `mappings` array of phrase pairs is an error.
pub fn parse_rewrite_response(raw: &str) -> Result<RewriteResult> {
    let cleaned = strip_json_fences(raw);
    serde_json::from_str(cleaned).with_context(|| {
        format!(
            "Model response is not a valid rewrite object (starts with: {:?})",
            cleaned.chars().take(80).collect::<String>()
        )
    })
}
