//! Hand-authored fleet records appended during threshold refinement
//!
//! The records carry their region and concentration label as written; they
//! are not run through classification. They exist so every region has
//! highly and substantially concentrated entries for the demo map.

use anyhow::{Context, Result};
use polars::prelude::*;

use super::regions::Region;
use super::schema::{
    ConcentrationType, CITY, CONCENTRATION_DESCRIPTION, CONCENTRATION_TYPE, FUEL_TYPE, REGION,
    STATE, VEHICLE_CLASS, VEHICLE_COUNT, VEHICLE_TYPE,
};

/// A fully specified fleet record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticRecord {
    pub state: &'static str,
    pub city: &'static str,
    pub vehicle_count: i64,
    pub vehicle_class: i64,
    pub vehicle_type: &'static str,
    pub fuel_type: &'static str,
    pub region: Region,
    pub concentration: ConcentrationType,
}

#[allow(clippy::too_many_arguments)]
const fn record(
    state: &'static str,
    city: &'static str,
    vehicle_count: i64,
    vehicle_class: i64,
    vehicle_type: &'static str,
    fuel_type: &'static str,
    region: Region,
    concentration: ConcentrationType,
) -> SyntheticRecord {
    SyntheticRecord {
        state,
        city,
        vehicle_count,
        vehicle_class,
        vehicle_type,
        fuel_type,
        region,
        concentration,
    }
}

use ConcentrationType::{HighlyConcentrated, SubstantiallyConcentrated};

pub const SYNTHETIC_RECORDS: [SyntheticRecord; 10] = [
    record("California", "Los Angeles", 250, 6, "Medium Duty", "CNG", Region::West, HighlyConcentrated),
    record("California", "San Francisco", 180, 6, "Medium Duty", "EV", Region::West, HighlyConcentrated),
    record("Texas", "Houston", 300, 8, "Heavy Duty", "CNG", Region::South, HighlyConcentrated),
    record("Texas", "Dallas", 220, 8, "Heavy Duty", "Diesel", Region::South, HighlyConcentrated),
    record("Illinois", "Chicago", 280, 7, "Heavy-Medium Duty", "CNG", Region::Midwest, HighlyConcentrated),
    record("New York", "New York", 320, 6, "Medium Duty", "EV", Region::Northeast, HighlyConcentrated),
    record("Florida", "Miami", 120, 7, "Heavy-Medium Duty", "CNG", Region::South, SubstantiallyConcentrated),
    record("Arizona", "Phoenix", 95, 8, "Heavy Duty", "CNG", Region::West, SubstantiallyConcentrated),
    record("Michigan", "Detroit", 110, 6, "Medium Duty", "CNG", Region::Midwest, SubstantiallyConcentrated),
    record("Massachusetts", "Boston", 85, 7, "Heavy-Medium Duty", "EV", Region::Northeast, SubstantiallyConcentrated),
];

/// Build a frame holding `records` under the standard column names
pub fn records_frame(records: &[SyntheticRecord]) -> Result<DataFrame> {
    let frame = DataFrame::new(vec![
        Column::new(STATE.into(), records.iter().map(|r| r.state).collect::<Vec<_>>()),
        Column::new(CITY.into(), records.iter().map(|r| r.city).collect::<Vec<_>>()),
        Column::new(
            VEHICLE_COUNT.into(),
            records.iter().map(|r| r.vehicle_count).collect::<Vec<_>>(),
        ),
        Column::new(
            VEHICLE_CLASS.into(),
            records.iter().map(|r| r.vehicle_class).collect::<Vec<_>>(),
        ),
        Column::new(
            VEHICLE_TYPE.into(),
            records.iter().map(|r| r.vehicle_type).collect::<Vec<_>>(),
        ),
        Column::new(FUEL_TYPE.into(), records.iter().map(|r| r.fuel_type).collect::<Vec<_>>()),
        Column::new(
            REGION.into(),
            records.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            CONCENTRATION_TYPE.into(),
            records.iter().map(|r| r.concentration.code()).collect::<Vec<_>>(),
        ),
        Column::new(
            CONCENTRATION_DESCRIPTION.into(),
            records
                .iter()
                .map(|r| r.concentration.description())
                .collect::<Vec<_>>(),
        ),
    ])?;

    Ok(frame)
}

/// Append `records` to the bottom of `df`.
///
/// The literal frame is aligned to the table first: columns the table lacks
/// are added to it filled with nulls, columns the records lack are null in
/// the new rows, and every value is cast to the table's column type.
pub fn append_records(df: &DataFrame, records: &[SyntheticRecord]) -> Result<DataFrame> {
    let extra = records_frame(records)?;
    let mut table = df.clone();

    for column in extra.get_columns() {
        if table.column(column.name()).is_err() {
            let nulls = Column::full_null(column.name().clone(), table.height(), column.dtype());
            table.with_column(nulls)?;
        }
    }

    let aligned: Vec<Column> = table
        .get_columns()
        .iter()
        .map(|target| -> Result<Column> {
            match extra.column(target.name()) {
                Ok(source) => source.cast(target.dtype()).with_context(|| {
                    format!(
                        "Cannot cast literal '{}' values to {}",
                        target.name(),
                        target.dtype()
                    )
                }),
                Err(_) => Ok(Column::full_null(
                    target.name().clone(),
                    extra.height(),
                    target.dtype(),
                )),
            }
        })
        .collect::<Result<_>>()?;

    let aligned = DataFrame::new(aligned)?;
    table
        .vstack_mut(&aligned)
        .context("Failed to append synthetic records")?;

    Ok(table)
}
