//! Error types for the enrichment pipeline.
//!
//! Pipeline functions return `anyhow::Result`; these variants are the
//! domain failures worth matching on (tests downcast to them).

use thiserror::Error;

/// Errors raised by the enrichment stages.
#[derive(Debug, Error, PartialEq)]
pub enum EnrichError {
    /// A column required by a stage is absent from the table.
    #[error("Required column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Rebalancing proportions are malformed.
    #[error("Invalid concentration proportions: {0}")]
    InvalidProportions(String),

    /// States with no region mapping, raised only in strict mode.
    #[error("{} state value(s) have no region mapping: {}", .0.len(), .0.join(", "))]
    UnmappedStates(Vec<String>),

    /// A concentration code outside 0..=2.
    #[error("Unknown concentration code {0}; expected 0, 1 or 2")]
    UnknownConcentrationCode(i64),

    /// File extension is neither csv nor parquet.
    #[error("Unsupported file format: '{0}'. Supported formats: csv, parquet")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_states_message_lists_states() {
        let err = EnrichError::UnmappedStates(vec![
            "District of Columbia".to_string(),
            "Puerto Rico".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 state value(s)"));
        assert!(msg.contains("District of Columbia, Puerto Rico"));
    }

    #[test]
    fn test_missing_column_message() {
        let err = EnrichError::MissingColumn {
            column: "State".to_string(),
            available: vec!["City".to_string()],
        };
        assert!(err.to_string().contains("'State'"));
    }
}
