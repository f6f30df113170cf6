//! JSON run report export
//!
//! Documents every stage executed in a run: files touched, row counts,
//! rebalancing parameters and the resulting concentration distribution.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ConcentrationProportions, Stage, StageOutcome};
use crate::report::ConcentrationDistribution;

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    pub tool_version: String,
}

/// Parameters used by the rebalancing stage
#[derive(Debug, Clone, Serialize)]
pub struct RebalanceSettings {
    pub seed: u64,
    pub proportions: ConcentrationProportions,
    /// Label quotas, indexed by concentration code
    pub target_counts: [usize; 3],
}

/// One executed stage
#[derive(Debug, Clone, Serialize)]
pub struct StageReportEntry {
    pub stage: Stage,
    pub title: String,
    pub input_file: String,
    pub output_file: String,
    pub rows_in: usize,
    pub rows_added: usize,
    pub rows_out: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmapped_states: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebalance: Option<RebalanceSettings>,
    pub distribution: ConcentrationDistribution,
}

impl StageReportEntry {
    pub fn new(
        outcome: &StageOutcome,
        distribution: ConcentrationDistribution,
        input: &Path,
        output: &Path,
        rebalance: Option<(u64, ConcentrationProportions)>,
    ) -> Self {
        let rebalance = match (rebalance, outcome.target_counts) {
            (Some((seed, proportions)), Some(target_counts)) => Some(RebalanceSettings {
                seed,
                proportions,
                target_counts,
            }),
            _ => None,
        };

        Self {
            stage: outcome.stage,
            title: outcome.stage.title().to_string(),
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            rows_in: outcome.rows_in,
            rows_added: outcome.rows_added,
            rows_out: outcome.table.height(),
            unmapped_states: outcome.unmapped_states.clone(),
            rebalance,
            distribution,
        }
    }
}

/// Complete run report
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub stages: Vec<StageReportEntry>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            metadata: RunMetadata {
                timestamp: Utc::now().to_rfc3339(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: StageReportEntry) {
        self.stages.push(entry);
    }

    /// Write the report as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run report: {}", path.display()))?;
        Ok(())
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
