use std::sync::Arc;

use crate::assets::icons::IconMap;
use crate::config::Config;
use crate::convert::DocumentConverter;
use crate::llm_client::GenerativeModel;
use crate::style::store::StyleStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generative model behind the rewrite orchestrator. Default: `LlmClient` (Gemini).
    pub model: Arc<dyn GenerativeModel>,
    /// Built once at startup, read-only afterwards.
    pub icons: Arc<IconMap>,
    pub converter: Arc<DocumentConverter>,
    pub styles: StyleStore,
    pub config: Config,
}
