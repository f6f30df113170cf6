//! Tests for synthetic record injection

use fleet_enrich::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_refinement_appends_ten_records() {
    let raw = create_fleet_dataframe();
    let enriched = enrich_geography(&raw, false).unwrap().table;

    let outcome = refine_thresholds(&enriched).unwrap();
    assert_eq!(outcome.table.height(), enriched.height() + SYNTHETIC_RECORDS.len());
    assert_eq!(outcome.rows_added, 10);
    assert_eq!(outcome.rows_in, enriched.height());
}

#[test]
fn test_appended_regions_match_lookup() {
    let enriched = enrich_geography(&create_fleet_dataframe(), false).unwrap().table;
    let out = refine_thresholds(&enriched).unwrap().table;

    let states = str_values(&out, "State");
    let regions = str_values(&out, "Region");
    for idx in enriched.height()..out.height() {
        let state = states[idx].as_deref().unwrap();
        let expected = region_for_state(state).map(|r| r.as_str().to_string());
        assert_eq!(regions[idx], expected, "Row {} ({})", idx, state);
    }
}

#[test]
fn test_appended_records_keep_authored_labels() {
    let enriched = enrich_geography(&create_fleet_dataframe(), false).unwrap().table;
    let out = refine_thresholds(&enriched).unwrap().table;

    let codes = i64_values(&out, "Concentration_Type");
    let appended: Vec<Option<i64>> = codes[enriched.height()..].to_vec();
    let authored: Vec<Option<i64>> = SYNTHETIC_RECORDS
        .iter()
        .map(|r| Some(r.concentration.code()))
        .collect();
    assert_eq!(appended, authored);
    assert_descriptions_match(&out);
}

#[test]
fn test_city_column_added_for_existing_rows() {
    let enriched = enrich_geography(&create_fleet_dataframe(), false).unwrap().table;
    assert!(enriched.column("City").is_err());

    let out = refine_thresholds(&enriched).unwrap().table;
    let cities = str_values(&out, "City");

    assert!(cities[..enriched.height()].iter().all(Option::is_none));
    assert_eq!(cities[enriched.height()].as_deref(), Some("Los Angeles"));
    assert_eq!(cities.last().unwrap().as_deref(), Some("Boston"));
}

#[test]
fn test_refinement_is_not_idempotent() {
    let enriched = enrich_geography(&create_fleet_dataframe(), false).unwrap().table;
    let once = refine_thresholds(&enriched).unwrap().table;
    let twice = refine_thresholds(&once).unwrap().table;

    assert_eq!(twice.height(), once.height() + 10);
}
