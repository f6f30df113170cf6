//! US census region lookup and the `Region` column
//!
//! The lookup is a fixed state-name table. District of Columbia and the
//! territories are not part of it and resolve to no region.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::schema::{require_columns, REGION, STATE};

/// One of the four census regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
    Northeast,
    Midwest,
    South,
    West,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Northeast, Region::Midwest, Region::South, Region::West];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Northeast => "Northeast",
            Region::Midwest => "Midwest",
            Region::South => "South",
            Region::West => "West",
        }
    }

    /// States belonging to this region
    pub fn states(self) -> &'static [&'static str] {
        match self {
            Region::Northeast => NORTHEAST,
            Region::Midwest => MIDWEST,
            Region::South => SOUTH,
            Region::West => WEST,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown region: '{}'", s))
    }
}

const NORTHEAST: &[&str] = &[
    "Maine",
    "New Hampshire",
    "Vermont",
    "Massachusetts",
    "Rhode Island",
    "Connecticut",
    "New York",
    "New Jersey",
    "Pennsylvania",
];

const MIDWEST: &[&str] = &[
    "Ohio",
    "Michigan",
    "Indiana",
    "Wisconsin",
    "Illinois",
    "Minnesota",
    "Iowa",
    "Missouri",
    "North Dakota",
    "South Dakota",
    "Nebraska",
    "Kansas",
];

const SOUTH: &[&str] = &[
    "Delaware",
    "Maryland",
    "Virginia",
    "West Virginia",
    "Kentucky",
    "Tennessee",
    "North Carolina",
    "South Carolina",
    "Georgia",
    "Florida",
    "Alabama",
    "Mississippi",
    "Arkansas",
    "Louisiana",
    "Oklahoma",
    "Texas",
];

const WEST: &[&str] = &[
    "Montana",
    "Idaho",
    "Wyoming",
    "Colorado",
    "New Mexico",
    "Arizona",
    "Utah",
    "Nevada",
    "Washington",
    "Oregon",
    "California",
    "Alaska",
    "Hawaii",
];

/// Look up the region of a state by exact name.
pub fn region_for_state(state: &str) -> Option<Region> {
    Region::ALL
        .into_iter()
        .find(|region| region.states().iter().any(|s| *s == state))
}

/// Result of adding the `Region` column to a table
#[derive(Debug)]
pub struct RegionAssignment {
    pub table: DataFrame,
    /// Distinct non-null state values with no region, sorted
    pub unmapped_states: Vec<String>,
}

/// Add (or replace in place) the `Region` column derived from `State`.
///
/// Unrecognized and null states produce a null region; the unrecognized
/// names are reported back so callers can warn or fail.
pub fn assign_regions(df: &DataFrame) -> Result<RegionAssignment> {
    require_columns(df, &[STATE])?;

    let states = df
        .column(STATE)?
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' must be text", STATE))?;

    let mut unmapped = BTreeSet::new();
    let regions: Vec<Option<&str>> = states
        .str()?
        .into_iter()
        .map(|state| {
            let state = state?;
            let region = region_for_state(state);
            if region.is_none() {
                unmapped.insert(state.to_string());
            }
            region.map(Region::as_str)
        })
        .collect();

    let mut table = df.clone();
    table.with_column(Column::new(REGION.into(), regions))?;

    Ok(RegionAssignment {
        table,
        unmapped_states: unmapped.into_iter().collect(),
    })
}
