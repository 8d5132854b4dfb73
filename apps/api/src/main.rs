mod analyze;
mod assets;
mod config;
mod convert;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod style;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assets::icons::load_icons;
use crate::config::Config;
use crate::convert::style_map::StyleMap;
use crate::convert::DocumentConverter;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::style::store::StyleStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Studio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; a missing key surfaces on the first /analyze call
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("GEMINI_API_KEY is not set; /analyze will fail until it is configured");
    }

    // Icons are read exactly once; handlers only ever see this snapshot
    let icons = load_icons(&config.icon_dir).await;

    let style_map = load_style_map(&config).await?;
    let converter = DocumentConverter::new(style_map, config.list_item_spacing);
    info!(
        "Document converter ready (list item spacing: {})",
        config.list_item_spacing
    );

    let styles = StyleStore::new(config.style_config_path.clone());
    info!("Style config file: {}", styles.path().display());

    // Build app state
    let state = AppState {
        model: Arc::new(llm),
        icons: Arc::new(icons),
        converter: Arc::new(converter),
        styles,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The ruleset from `STYLE_MAP_PATH`, parsed strictly, or the built-in one.
async fn load_style_map(config: &Config) -> Result<StyleMap> {
    let Some(path) = &config.style_map_path else {
        return Ok(StyleMap::resume_default());
    };

    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read style map {}", path.display()))?;
    let style_map = StyleMap::parse(&source)
        .with_context(|| format!("Invalid style map {}", path.display()))?;
    info!("Loaded style map from {}", path.display());
    Ok(style_map)
}
