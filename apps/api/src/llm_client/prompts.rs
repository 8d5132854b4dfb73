// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction block that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Return ONLY valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Instruction to keep the caller's markup intact.
pub const PRESERVE_HTML_INSTRUCTION: &str = "\
    Use the exact same HTML structure as the input. \
    Do NOT add, remove, or reorder elements, and keep every attribute as it was.";
