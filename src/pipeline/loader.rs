//! Fleet table loading and saving for CSV and Parquet files

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use tempfile::NamedTempFile;

use super::error::EnrichError;

/// Supported on-disk table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Pick the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, EnrichError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "parquet" => Ok(TableFormat::Parquet),
            _ => Err(EnrichError::UnsupportedFormat(extension)),
        }
    }
}

/// Load a fleet table from a file (CSV or Parquet based on extension).
///
/// CSV files must carry a header row. Integer columns are inferred as
/// Int64 and empty fields are read as nulls. `infer_schema_length` of 0
/// scans the whole file for type inference.
pub fn load_table(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let format = TableFormat::from_path(path)?;

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match format {
        TableFormat::Csv => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        TableFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
    };

    lf.collect()
        .with_context(|| format!("Failed to read table from {}", path.display()))
}

/// Save a fleet table (CSV or Parquet based on extension).
///
/// CSV output has a header row and no index column; column order is kept.
/// The table is written to a temporary file beside `path` and moved over it
/// once complete, so a failed write leaves any existing file untouched.
pub fn save_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = TableFormat::from_path(path)?;

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;

    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut staged)
                .include_header(true)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(&mut staged)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
    }

    staged
        .persist(path)
        .with_context(|| format!("Failed to replace output file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("a/b.CSV")).unwrap(),
            TableFormat::Csv
        );
        assert_eq!(
            TableFormat::from_path(Path::new("fleet.parquet")).unwrap(),
            TableFormat::Parquet
        );
        assert_eq!(
            TableFormat::from_path(Path::new("fleet.xlsx")),
            Err(EnrichError::UnsupportedFormat("xlsx".to_string()))
        );
    }
}
