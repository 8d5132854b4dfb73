//! Static resume JSON, read from disk on every request and returned as-is.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResumeDataError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

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
}

pub async fn load_resume_data(path: &Path) -> Result<Value, ResumeDataError> {
    let raw = tokio::fs::read(path).await.map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ResumeDataError::NotFound(path.to_path_buf())
        } else {
            ResumeDataError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_slice(&raw).map_err(|source| {
        ResumeDataError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })
}
