//! Unit tests for table loading and saving

use fleet_enrich::pipeline::*;
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("fleet.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "State,Vehicle_Count,Vehicle_Class,Vehicle_Type,Fuel_Type").unwrap();
    writeln!(file, "Texas,200,8,Heavy Duty,Diesel").unwrap();
    writeln!(file, "Ohio,60,7,Heavy-Medium Duty,CNG").unwrap();
    drop(file);

    let df = load_table(&csv_path, 100).unwrap();

    assert_shape(&df, 2, 5);
    assert_eq!(
        column_names(&df),
        vec!["State", "Vehicle_Count", "Vehicle_Class", "Vehicle_Type", "Fuel_Type"]
    );
    assert_eq!(df.column("Vehicle_Count").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_missing_file_errors() {
    let temp_dir = TempDir::new().unwrap();
    let err = load_table(&temp_dir.path().join("absent.csv"), 100).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_unsupported_extension_errors() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fleet.json");
    std::fs::write(&path, "{}").unwrap();

    let err = load_table(&path, 100).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EnrichError>(),
        Some(&EnrichError::UnsupportedFormat("json".to_string()))
    );
}

#[test]
fn test_csv_round_trip_preserves_order_and_types() {
    let mut df = enrich_geography(&create_fleet_dataframe(), false).unwrap().table;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("enhanced.csv");

    save_table(&mut df, &path).unwrap();
    let loaded = load_table(&path, 100).unwrap();

    assert_eq!(column_names(&loaded), column_names(&df));
    assert_eq!(loaded.height(), df.height());
    for column in ["Vehicle_Count", "Vehicle_Class", "Concentration_Type"] {
        assert_eq!(loaded.column(column).unwrap().dtype(), &DataType::Int64);
        assert_eq!(i64_values(&loaded, column), i64_values(&df, column));
    }
    for column in ["State", "Region", "Concentration_Description"] {
        assert_eq!(str_values(&loaded, column), str_values(&df, column));
    }
}

#[test]
fn test_csv_has_header_and_no_index_column() {
    let mut df = df! {
        "State" => ["Texas"],
        "Vehicle_Count" => [3i64],
    }
    .unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.csv");

    save_table(&mut df, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("State,Vehicle_Count"));
    assert_eq!(lines.next(), Some("Texas,3"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_parquet_round_trip() {
    let mut df = create_fleet_dataframe();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fleet.parquet");

    save_table(&mut df, &path).unwrap();
    let loaded = load_table(&path, 100).unwrap();

    assert!(loaded.equals_missing(&df));
}

#[test]
fn test_save_creates_parent_directory() {
    let mut df = create_fleet_dataframe();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("public").join("fleet.csv");

    save_table(&mut df, &path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_failed_save_keeps_existing_file() {
    let mut original = create_fleet_dataframe();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fleet.csv");
    save_table(&mut original, &path).unwrap();

    // CSV cannot hold nested columns, so this write fails part way
    let nested = Series::new(
        "Cities".into(),
        [
            Series::new("".into(), ["Austin", "Dallas"]),
            Series::new("".into(), ["Columbus"]),
        ],
    );
    let mut unwritable = DataFrame::new(vec![
        Column::new("State".into(), ["Texas", "Ohio"]),
        nested.into(),
    ])
    .unwrap();

    assert!(save_table(&mut unwritable, &path).is_err());

    let reloaded = load_table(&path, 100).unwrap();
    assert_shape(&reloaded, 10, 5);
    assert_eq!(str_values(&reloaded, "State"), str_values(&original, "State"));

    let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_save_overwrites_in_place() {
    let mut df = create_fleet_dataframe();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fleet.csv");
    save_table(&mut df, &path).unwrap();

    let mut refined = refine_thresholds(&load_table(&path, 100).unwrap()).unwrap().table;
    save_table(&mut refined, &path).unwrap();

    assert_eq!(load_table(&path, 100).unwrap().height(), 20);
}
