#![deny(unsafe_code)]

use std::path::PathBuf;

use arcmap_model::ArcmapError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Arcmap(#[from] ArcmapError),

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    /// The taxonomy error behind this failure, if any.
    pub fn as_arcmap(&self) -> Option<&ArcmapError> {
        match self {
            Self::Arcmap(error) => Some(error),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
