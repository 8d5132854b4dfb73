//! Flat-file style store. No locking: concurrent saves are last-writer-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::style::StyleConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct StyleStore {
    path: PathBuf,
}

impl StyleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `config` as four-space-indented JSON, replacing the file.
    pub async fn save(&self, config: &StyleConfig) -> Result<(), StoreError> {
        let json = to_pretty_json(config)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        info!("Saved style config to {}", self.path.display());
        Ok(())
    }

    /// Reads the stored config. A missing file yields `StyleConfig::unsaved()`;
    /// stored objects missing fields are completed from the defaults.
    pub async fn load(&self) -> Result<StyleConfig, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "No style config at {}, serving defaults",
                    self.path.display()
                );
                return Ok(StyleConfig::unsaved());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&raw).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
