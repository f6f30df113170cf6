//! State-share concentration classification
//!
//! A record's share is the percentage of its vehicle class's fleet-wide
//! `Vehicle_Count` that sits in the record's state. Shares are bucketed
//! into [`ConcentrationType`] labels with a pair of percentage cut-offs.

use std::collections::HashMap;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::schema::{
    require_columns, write_concentration, ConcentrationType, STATE, VEHICLE_CLASS, VEHICLE_COUNT,
};

/// Percentage cut-offs separating the three concentration buckets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcentrationThresholds {
    /// Shares at or above this are highly concentrated
    pub high: f64,
    /// Shares at or above this (and below `high`) are substantially concentrated
    pub substantial: f64,
}

impl ConcentrationThresholds {
    /// Cut-offs used by the initial geographic enrichment
    pub const INITIAL: ConcentrationThresholds = ConcentrationThresholds {
        high: 8.0,
        substantial: 3.0,
    };

    /// Revised cut-offs used by threshold refinement
    pub const REFINED: ConcentrationThresholds = ConcentrationThresholds {
        high: 15.0,
        substantial: 5.0,
    };

    /// Bucket a share percentage. Boundaries belong to the more concentrated bucket.
    pub fn classify(&self, share: f64) -> ConcentrationType {
        if share >= self.high {
            ConcentrationType::HighlyConcentrated
        } else if share >= self.substantial {
            ConcentrationType::SubstantiallyConcentrated
        } else {
            ConcentrationType::National
        }
    }
}

/// Per-row state share (0-100) of the row's vehicle class.
///
/// Both group totals are reduced once up front. Rows with a null state,
/// class or a class whose total is zero get a share of 0. Null counts
/// contribute nothing to either total.
pub fn state_shares(df: &DataFrame) -> Result<Vec<f64>> {
    require_columns(df, &[STATE, VEHICLE_CLASS, VEHICLE_COUNT])?;

    let states = df.column(STATE)?.cast(&DataType::String)?;
    let classes = df
        .column(VEHICLE_CLASS)?
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' must be integer", VEHICLE_CLASS))?;
    let counts = df
        .column(VEHICLE_COUNT)?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' must be numeric", VEHICLE_COUNT))?;

    let states = states.str()?;
    let classes = classes.i64()?;
    let counts = counts.f64()?;

    let mut class_state_totals: HashMap<(i64, &str), f64> = HashMap::new();
    let mut class_totals: HashMap<i64, f64> = HashMap::new();

    for ((state, class), count) in states.into_iter().zip(classes).zip(counts) {
        let (Some(class), Some(count)) = (class, count) else {
            continue;
        };
        *class_totals.entry(class).or_insert(0.0) += count;
        if let Some(state) = state {
            *class_state_totals.entry((class, state)).or_insert(0.0) += count;
        }
    }

    let shares = states
        .into_iter()
        .zip(classes)
        .map(|(state, class)| {
            let (Some(state), Some(class)) = (state, class) else {
                return 0.0;
            };
            let class_total = class_totals.get(&class).copied().unwrap_or(0.0);
            if class_total > 0.0 {
                let state_total = class_state_totals
                    .get(&(class, state))
                    .copied()
                    .unwrap_or(0.0);
                state_total / class_total * 100.0
            } else {
                0.0
            }
        })
        .collect();

    Ok(shares)
}

/// Recompute `Concentration_Type` and `Concentration_Description` for every row.
///
/// Existing classification columns are overwritten in place; the result is
/// a full recomputation, independent of any previous labels.
pub fn classify_concentration(
    df: &DataFrame,
    thresholds: ConcentrationThresholds,
) -> Result<DataFrame> {
    let labels: Vec<ConcentrationType> = state_shares(df)?
        .into_iter()
        .map(|share| thresholds.classify(share))
        .collect();

    let mut table = df.clone();
    write_concentration(&mut table, &labels)?;
    Ok(table)
}
