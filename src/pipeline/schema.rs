//! Fleet record columns and the concentration classification labels

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::error::EnrichError;

pub const STATE: &str = "State";
pub const CITY: &str = "City";
pub const VEHICLE_COUNT: &str = "Vehicle_Count";
pub const VEHICLE_CLASS: &str = "Vehicle_Class";
pub const VEHICLE_TYPE: &str = "Vehicle_Type";
pub const FUEL_TYPE: &str = "Fuel_Type";
pub const REGION: &str = "Region";
pub const CONCENTRATION_TYPE: &str = "Concentration_Type";
pub const CONCENTRATION_DESCRIPTION: &str = "Concentration_Description";

/// Ordinal concentration bucket assigned to every record.
///
/// Lower codes mean a state holds a larger share of a vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConcentrationType {
    HighlyConcentrated,
    SubstantiallyConcentrated,
    National,
}

impl ConcentrationType {
    pub const ALL: [ConcentrationType; 3] = [
        ConcentrationType::HighlyConcentrated,
        ConcentrationType::SubstantiallyConcentrated,
        ConcentrationType::National,
    ];

    /// Integer code persisted in the `Concentration_Type` column
    pub fn code(self) -> i64 {
        match self {
            ConcentrationType::HighlyConcentrated => 0,
            ConcentrationType::SubstantiallyConcentrated => 1,
            ConcentrationType::National => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, EnrichError> {
        match code {
            0 => Ok(ConcentrationType::HighlyConcentrated),
            1 => Ok(ConcentrationType::SubstantiallyConcentrated),
            2 => Ok(ConcentrationType::National),
            other => Err(EnrichError::UnknownConcentrationCode(other)),
        }
    }

    /// Text persisted in the `Concentration_Description` column
    pub fn description(self) -> &'static str {
        match self {
            ConcentrationType::HighlyConcentrated => "Highly Concentrated",
            ConcentrationType::SubstantiallyConcentrated => "Substantially Concentrated",
            ConcentrationType::National => "National",
        }
    }
}

impl std::fmt::Display for ConcentrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Fail with `EnrichError::MissingColumn` unless every named column exists.
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for column in columns {
        if !available.iter().any(|c| c == column) {
            return Err(EnrichError::MissingColumn {
                column: column.to_string(),
                available,
            }
            .into());
        }
    }

    Ok(())
}

/// Read the `Concentration_Type` column as typed labels.
///
/// Null codes come back as `None`; codes outside 0..=2 are an error.
pub fn concentration_labels(df: &DataFrame) -> Result<Vec<Option<ConcentrationType>>> {
    require_columns(df, &[CONCENTRATION_TYPE])?;

    let codes = df
        .column(CONCENTRATION_TYPE)?
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' must be integer", CONCENTRATION_TYPE))?;

    codes
        .i64()?
        .into_iter()
        .map(|code| -> Result<Option<ConcentrationType>> {
            match code {
                Some(c) => Ok(Some(ConcentrationType::from_code(c)?)),
                None => Ok(None),
            }
        })
        .collect()
}

/// Write both classification columns from one set of labels.
///
/// The two columns are only ever produced together, so type and
/// description cannot disagree.
pub fn write_concentration(df: &mut DataFrame, labels: &[ConcentrationType]) -> Result<()> {
    let codes: Vec<i64> = labels.iter().map(|l| l.code()).collect();
    let descriptions: Vec<&str> = labels.iter().map(|l| l.description()).collect();

    df.with_column(Column::new(CONCENTRATION_TYPE.into(), codes))?;
    df.with_column(Column::new(CONCENTRATION_DESCRIPTION.into(), descriptions))?;

    Ok(())
}
