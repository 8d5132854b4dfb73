use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, PRESERVE_HTML_INSTRUCTION};

/// Marker the model must wrap around every span of text it adds or changes.
pub const EDIT_MARKER_OPEN: &str = r#"<mark data-type="ai-edit" data-reason="YOUR_REASONING">"#;

/// Builds the rewrite prompt. Both inputs are embedded verbatim.
pub fn build_rewrite_prompt(resume_html: &str, job_description: &str) -> String {
    format!(
        r#"You are an expert Resume Editor.
Task: Rewrite the provided Resume HTML to better match the Job Description.

CRITICAL OUTPUT RULES:
1. {json_only}
2. The JSON must have exactly two keys: "html" and "mappings".
3. In the "html" string:
   - {preserve_html}
   - Wrap ANY text you add/change in: {EDIT_MARKER_OPEN}new text</mark>
4. In the "mappings" array:
   - Return pairs linking job description language to resume language: {{"jd_phrase": "text", "resume_phrase": "text"}}

RESUME HTML:
{resume_html}

JOB DESCRIPTION:
{job_description}
"#,
        json_only = JSON_ONLY_INSTRUCTION.trim(),
        preserve_html = PRESERVE_HTML_INSTRUCTION.trim(),
    )
}
