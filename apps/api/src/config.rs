use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; the model key is checked on first use.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub style_config_path: PathBuf,
    pub resume_data_path: PathBuf,
    pub icon_dir: PathBuf,
    /// Replaces the built-in style-mapping ruleset when set.
    pub style_map_path: Option<PathBuf>,
    /// Enables the `<li>` margin rewrite after conversion.
    pub list_item_spacing: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            style_config_path: path_env("STYLE_CONFIG_PATH", "default_style.json"),
            resume_data_path: path_env("RESUME_DATA_PATH", "testResume.json"),
            icon_dir: path_env("ICON_DIR", "assets/icons"),
            style_map_path: optional_env("STYLE_MAP_PATH").map(PathBuf::from),
            list_item_spacing: match optional_env("LIST_ITEM_SPACING") {
                Some(raw) => parse_bool(&raw).context("LIST_ITEM_SPACING must be a boolean")?,
                None => false,
            },
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn path_env(key: &str, default: &str) -> PathBuf {
    optional_env(key)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}

#[cfg(test)]
impl Config {
    /// A config rooted in `dir`, with no model key.
    pub fn rooted_at(dir: &std::path::Path) -> Self {
        Config {
            gemini_api_key: None,
            style_config_path: dir.join("default_style.json"),
            resume_data_path: dir.join("testResume.json"),
            icon_dir: dir.join("icons"),
            style_map_path: None,
            list_item_spacing: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
