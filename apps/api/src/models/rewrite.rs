use serde::{Deserialize, Serialize};

/// A job-description phrase and the resume phrase the model tied it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseMapping {
    pub jd_phrase: String,
    pub resume_phrase: String,
}

/// Annotated resume returned by the rewrite orchestrator. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub html: String,
    pub mappings: Vec<PhraseMapping>,
}
