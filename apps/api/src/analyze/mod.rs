// Resume rewrite: prompt composition, model call, response sanitizing.
// All model calls go through llm_client; nothing here talks to Gemini directly.

pub mod handlers;
pub mod prompts;
pub mod rewrite;
