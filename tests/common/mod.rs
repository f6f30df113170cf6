//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

pub const STATES: [&str; 12] = [
    "California",
    "Texas",
    "New York",
    "Illinois",
    "Florida",
    "Ohio",
    "Georgia",
    "Washington",
    "Arizona",
    "Michigan",
    "Massachusetts",
    "Colorado",
];

/// Create a small raw fleet table shaped like the stage-1 input file
///
/// There is no `City` column, and one row uses District of Columbia,
/// which has no region.
pub fn create_fleet_dataframe() -> DataFrame {
    df! {
        "State" => ["California", "California", "Texas", "Texas", "Ohio",
                    "New York", "Maine", "District of Columbia", "Florida", "Oregon"],
        "Vehicle_Count" => [120i64, 40, 200, 15, 60, 90, 5, 12, 30, 8],
        "Vehicle_Class" => [6i64, 7, 8, 6, 7, 6, 8, 6, 8, 7],
        "Vehicle_Type" => ["Medium Duty", "Heavy-Medium Duty", "Heavy Duty", "Medium Duty",
                           "Heavy-Medium Duty", "Medium Duty", "Heavy Duty", "Medium Duty",
                           "Heavy Duty", "Heavy-Medium Duty"],
        "Fuel_Type" => ["CNG", "EV", "Diesel", "CNG", "CNG", "EV", "Diesel", "EV", "CNG", "EV"],
    }
    .unwrap()
}

/// Create a generated fleet table with `rows` records over mapped states
pub fn create_random_fleet_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let states: Vec<&str> = (0..rows)
        .map(|_| STATES[rng.gen_range(0..STATES.len())])
        .collect();
    let counts: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..400)).collect();
    let classes: Vec<i64> = (0..rows).map(|_| rng.gen_range(6..=8)).collect();
    let types: Vec<&str> = classes
        .iter()
        .map(|c| match c {
            6 => "Medium Duty",
            7 => "Heavy-Medium Duty",
            _ => "Heavy Duty",
        })
        .collect();
    let fuels: Vec<&str> = (0..rows)
        .map(|_| ["CNG", "EV", "Diesel"][rng.gen_range(0..3)])
        .collect();

    df! {
        "State" => states,
        "Vehicle_Count" => counts,
        "Vehicle_Class" => classes,
        "Vehicle_Type" => types,
        "Fuel_Type" => fuels,
    }
    .unwrap()
}

/// Create a temporary directory holding `df` written as CSV under `name`
pub fn create_temp_csv_named(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    create_temp_csv_named(df, "test_data.csv")
}

/// Collect an integer column
pub fn i64_values(df: &DataFrame, column: &str) -> Vec<Option<i64>> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Collect a text column
pub fn str_values(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Column names in table order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Assert every row's description is the fixed mirror of its type code
pub fn assert_descriptions_match(df: &DataFrame) {
    let codes = i64_values(df, "Concentration_Type");
    let descriptions = str_values(df, "Concentration_Description");

    for (idx, (code, desc)) in codes.iter().zip(descriptions.iter()).enumerate() {
        let expected = match code {
            Some(0) => "Highly Concentrated",
            Some(1) => "Substantially Concentrated",
            Some(2) => "National",
            other => panic!("Row {} has invalid concentration code {:?}", idx, other),
        };
        assert_eq!(
            desc.as_deref(),
            Some(expected),
            "Row {} description disagrees with code {:?}",
            idx,
            code
        );
    }
}

/// Count rows per concentration code
pub fn code_counts(df: &DataFrame) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for code in i64_values(df, "Concentration_Type").into_iter().flatten() {
        counts[code as usize] += 1;
    }
    counts
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}
