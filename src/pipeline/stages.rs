//! The three enrichment stages as pure table transformations
//!
//! Each stage takes a table and its parameters and returns a new table;
//! reading and writing files is left to the caller.

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::concentration::{classify_concentration, ConcentrationThresholds};
use super::error::EnrichError;
use super::rebalance::{rebalance_concentration, ConcentrationProportions};
use super::regions::assign_regions;
use super::schema::{require_columns, STATE, VEHICLE_CLASS, VEHICLE_COUNT};
use super::synthetic::{append_records, SYNTHETIC_RECORDS};

/// Pipeline stage identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Region lookup plus initial concentration classification
    Enrich,
    /// Revised thresholds plus synthetic record injection
    Refine,
    /// Quota shuffle of concentration labels
    Rebalance,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Enrich, Stage::Refine, Stage::Rebalance];

    pub fn title(self) -> &'static str {
        match self {
            Stage::Enrich => "Geographic Enrichment",
            Stage::Refine => "Threshold Refinement",
            Stage::Rebalance => "Distribution Rebalancing",
        }
    }

    /// 1-based position in the pipeline
    pub fn number(self) -> u8 {
        match self {
            Stage::Enrich => 1,
            Stage::Refine => 2,
            Stage::Rebalance => 3,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Enrich => write!(f, "enrich"),
            Stage::Refine => write!(f, "refine"),
            Stage::Rebalance => write!(f, "rebalance"),
        }
    }
}

/// What a stage produced
#[derive(Debug)]
pub struct StageOutcome {
    pub stage: Stage,
    pub table: DataFrame,
    pub rows_in: usize,
    /// Rows appended by the stage (synthetic records)
    pub rows_added: usize,
    /// State values that did not resolve to a region
    pub unmapped_states: Vec<String>,
    /// Filled label quotas, rebalancing only
    pub target_counts: Option<[usize; 3]>,
}

impl StageOutcome {
    fn new(stage: Stage, input: &DataFrame, table: DataFrame) -> Self {
        let rows_in = input.height();
        let rows_added = table.height().saturating_sub(rows_in);
        Self {
            stage,
            table,
            rows_in,
            rows_added,
            unmapped_states: Vec::new(),
            target_counts: None,
        }
    }
}

/// Stage 1: add `Region` and the initial state-share classification.
///
/// States missing from the lookup get a null region. With `strict_regions`
/// they fail the stage instead.
pub fn enrich_geography(df: &DataFrame, strict_regions: bool) -> Result<StageOutcome> {
    require_columns(df, &[STATE, VEHICLE_CLASS, VEHICLE_COUNT])?;

    let assignment = assign_regions(df)?;
    if strict_regions && !assignment.unmapped_states.is_empty() {
        return Err(EnrichError::UnmappedStates(assignment.unmapped_states).into());
    }

    let table = classify_concentration(&assignment.table, ConcentrationThresholds::INITIAL)?;

    let mut outcome = StageOutcome::new(Stage::Enrich, df, table);
    outcome.unmapped_states = assignment.unmapped_states;
    Ok(outcome)
}

/// Stage 2: reclassify every row with the revised thresholds, then append
/// the synthetic records with their authored labels.
pub fn refine_thresholds(df: &DataFrame) -> Result<StageOutcome> {
    let classified = classify_concentration(df, ConcentrationThresholds::REFINED)?;
    let table = append_records(&classified, &SYNTHETIC_RECORDS)?;

    Ok(StageOutcome::new(Stage::Refine, df, table))
}

/// Stage 3: replace every label with a seeded quota shuffle.
pub fn rebalance_distribution(
    df: &DataFrame,
    proportions: &ConcentrationProportions,
    seed: u64,
) -> Result<StageOutcome> {
    let rebalanced = rebalance_concentration(df, proportions, seed)?;

    let mut outcome = StageOutcome::new(Stage::Rebalance, df, rebalanced.table);
    outcome.target_counts = Some(rebalanced.target_counts);
    Ok(outcome)
}
