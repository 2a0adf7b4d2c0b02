use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use arcmap_model::ArcmapError;

use crate::error::{IngestError, Result};

/// Reads a tabular data dictionary from disk.
///
/// Only CSV files are supported; empty cells become nulls.
pub fn read_data(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => read_csv(path),
        _ => Err(ArcmapError::configuration(format!(
            "unsupported dictionary file type: {}",
            path.display()
        ))
        .into()),
    }
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| IngestError::Table {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read dictionary table"
    );
    Ok(df)
}
