//! Quota-based reassignment of concentration labels
//!
//! Rebalancing ignores the computed classification: it builds a pool of
//! labels sized to an exact target split, shuffles it with a seeded RNG and
//! hands the pool out in table order.

use anyhow::Result;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::error::EnrichError;
use super::schema::{write_concentration, ConcentrationType};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Allowed distance of the proportion sum from 1.0
const SUM_TOLERANCE: f64 = 1e-9;

/// Target share of rows for each concentration label, in label order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcentrationProportions {
    pub highly_concentrated: f64,
    pub substantially_concentrated: f64,
    pub national: f64,
}

impl Default for ConcentrationProportions {
    /// 50% highly, 30% substantially concentrated, 20% national
    fn default() -> Self {
        Self {
            highly_concentrated: 0.5,
            substantially_concentrated: 0.3,
            national: 0.2,
        }
    }
}

impl ConcentrationProportions {
    /// Build a proportion set, rejecting components outside [0, 1] and sums other than 1.
    pub fn new(highly: f64, substantially: f64, national: f64) -> Result<Self, EnrichError> {
        let parts = [highly, substantially, national];

        if let Some(bad) = parts.iter().find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0) {
            return Err(EnrichError::InvalidProportions(format!(
                "each proportion must be between 0.0 and 1.0, got {}",
                bad
            )));
        }

        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(EnrichError::InvalidProportions(format!(
                "proportions must sum to 1.0, got {}",
                sum
            )));
        }

        Ok(Self {
            highly_concentrated: highly,
            substantially_concentrated: substantially,
            national,
        })
    }

    pub fn get(&self, label: ConcentrationType) -> f64 {
        match label {
            ConcentrationType::HighlyConcentrated => self.highly_concentrated,
            ConcentrationType::SubstantiallyConcentrated => self.substantially_concentrated,
            ConcentrationType::National => self.national,
        }
    }

    /// Exact label counts for `rows` records.
    ///
    /// Each count is `floor(rows * p)`; whatever the flooring leaves over
    /// goes to the highly concentrated bucket.
    pub fn target_counts(&self, rows: usize) -> Result<[usize; 3], EnrichError> {
        let mut counts = ConcentrationType::ALL.map(|label| (rows as f64 * self.get(label)).floor() as usize);

        let assigned: usize = counts.iter().sum();
        if assigned > rows {
            return Err(EnrichError::InvalidProportions(format!(
                "proportions allocate {} labels for {} rows",
                assigned, rows
            )));
        }
        counts[0] += rows - assigned;

        Ok(counts)
    }
}

impl std::str::FromStr for ConcentrationProportions {
    type Err = String;

    /// Parse `"0.5,0.3,0.2"` (highly, substantially, national)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a valid number", p.trim()))
            })
            .collect::<Result<Vec<f64>, String>>()?;

        match parts.as_slice() {
            [h, s, n] => ConcentrationProportions::new(*h, *s, *n).map_err(|e| e.to_string()),
            _ => Err(format!(
                "expected three comma-separated proportions, got {}",
                parts.len()
            )),
        }
    }
}

impl std::fmt::Display for ConcentrationProportions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.highly_concentrated, self.substantially_concentrated, self.national
        )
    }
}

/// Table with reassigned labels plus the quotas that were filled
#[derive(Debug)]
pub struct RebalanceOutcome {
    pub table: DataFrame,
    /// Label counts indexed by concentration code
    pub target_counts: [usize; 3],
}

/// Shuffled label pool holding `counts[code]` entries of each label
pub fn label_pool(counts: [usize; 3], seed: u64) -> Vec<ConcentrationType> {
    let mut pool = Vec::with_capacity(counts.iter().sum());
    for (label, count) in ConcentrationType::ALL.into_iter().zip(counts) {
        pool.extend(std::iter::repeat(label).take(count));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    pool.shuffle(&mut rng);

    pool
}

/// Overwrite both classification columns with a seeded quota shuffle.
///
/// Row count and every other column are untouched. The same input height,
/// proportions and seed always produce the same per-row labels.
pub fn rebalance_concentration(
    df: &DataFrame,
    proportions: &ConcentrationProportions,
    seed: u64,
) -> Result<RebalanceOutcome> {
    let target_counts = proportions.target_counts(df.height())?;
    let pool = label_pool(target_counts, seed);

    let mut table = df.clone();
    write_concentration(&mut table, &pool)?;

    Ok(RebalanceOutcome {
        table,
        target_counts,
    })
}
