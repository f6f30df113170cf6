//! Tests for region assignment

use fleet_enrich::pipeline::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_every_lookup_state_maps_to_its_region() {
    for region in Region::ALL {
        for state in region.states() {
            assert_eq!(
                region_for_state(state),
                Some(region),
                "{} should map to {}",
                state,
                region
            );
        }
    }
}

#[test]
fn test_lookup_table_sizes() {
    let sizes: Vec<usize> = Region::ALL.iter().map(|r| r.states().len()).collect();
    assert_eq!(sizes, vec![9, 12, 16, 13]);
    assert_eq!(sizes.iter().sum::<usize>(), 50);
}

#[test]
fn test_boundary_states_map_to_fixed_regions() {
    let expected = [
        ("Pennsylvania", Region::Northeast),
        ("New Jersey", Region::Northeast),
        ("Maine", Region::Northeast),
        ("Ohio", Region::Midwest),
        ("Kansas", Region::Midwest),
        ("North Dakota", Region::Midwest),
        ("Delaware", Region::South),
        ("Maryland", Region::South),
        ("Texas", Region::South),
        ("Oklahoma", Region::South),
        ("Montana", Region::West),
        ("New Mexico", Region::West),
        ("Alaska", Region::West),
        ("Hawaii", Region::West),
    ];

    for (state, region) in expected {
        assert_eq!(region_for_state(state), Some(region), "{}", state);
    }
}

#[test]
fn test_lookup_is_exact_match() {
    assert_eq!(region_for_state("texas"), None);
    assert_eq!(region_for_state(" Texas"), None);
    assert_eq!(region_for_state("Puerto Rico"), None);
}

#[test]
fn test_district_of_columbia_has_no_region() {
    assert_eq!(region_for_state("District of Columbia"), None);
}

#[test]
fn test_assign_regions_appends_column_and_reports_unmapped() {
    let df = create_fleet_dataframe();
    let assignment = assign_regions(&df).unwrap();

    assert_eq!(column_names(&assignment.table).last().unwrap(), "Region");
    assert_eq!(assignment.table.height(), df.height());

    let regions = str_values(&assignment.table, "Region");
    assert_eq!(regions[0].as_deref(), Some("West"));
    assert_eq!(regions[2].as_deref(), Some("South"));
    assert_eq!(regions[4].as_deref(), Some("Midwest"));
    assert_eq!(regions[6].as_deref(), Some("Northeast"));
    assert_eq!(regions[7], None, "District of Columbia must have no region");

    assert_eq!(assignment.unmapped_states, vec!["District of Columbia".to_string()]);
}

#[test]
fn test_assign_regions_is_idempotent() {
    let df = create_fleet_dataframe();
    let once = assign_regions(&df).unwrap().table;
    let twice = assign_regions(&once).unwrap().table;

    assert_eq!(column_names(&once), column_names(&twice));
    assert!(once.equals_missing(&twice));
}

#[test]
fn test_null_state_gets_null_region_without_being_reported() {
    let df = df! {
        "State" => [Some("Texas"), None],
    }
    .unwrap();

    let assignment = assign_regions(&df).unwrap();
    assert_eq!(
        str_values(&assignment.table, "Region"),
        vec![Some("South".to_string()), None]
    );
    assert!(assignment.unmapped_states.is_empty());
}

#[test]
fn test_missing_state_column_errors() {
    let df = df! { "City" => ["Austin"] }.unwrap();
    let err = assign_regions(&df).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EnrichError>(),
        Some(EnrichError::MissingColumn { .. })
    ));
}
