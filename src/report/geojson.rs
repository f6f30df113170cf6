//! GeoJSON export of a classified fleet table for map rendering
//!
//! Rows are drawn as a label-balanced sample, placed with the static
//! location table and written as a `FeatureCollection` with a metadata
//! block summarising the whole table.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::pipeline::{
    concentration_labels, locate, require_columns, ConcentrationType, LocationMatch, CITY,
    CONCENTRATION_DESCRIPTION, CONCENTRATION_TYPE, FUEL_TYPE, STATE, VEHICLE_CLASS,
    VEHICLE_COUNT, VEHICLE_TYPE,
};
use crate::report::ConcentrationDistribution;

pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_MAX_FEATURES: usize = 200;

/// Sampling limits for an export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    /// Rows drawn from the table, split evenly across the three labels
    pub sample_size: usize,
    /// Upper bound on features written
    pub max_features: usize,
    pub seed: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_features: DEFAULT_MAX_FEATURES,
            seed: crate::pipeline::DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureProperties {
    pub city: String,
    pub state: String,
    pub vehicle_count: Option<i64>,
    pub vehicle_class: Option<i64>,
    pub vehicle_type: Option<String>,
    pub fuel_type: Option<String>,
    pub concentration_type: i64,
    pub concentration_description: String,
    /// True when the point is a state centroid rather than the city
    pub approximate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub total_records: usize,
    pub sampled_records: usize,
    pub processed: usize,
    pub approximate: usize,
    pub failed: usize,
    /// Label counts over the whole table, keyed "Description (code)"
    pub concentration_distribution: BTreeMap<String, usize>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
    pub metadata: ExportMetadata,
}

impl FeatureCollection {
    /// Write the collection as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize GeoJSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write GeoJSON file: {}", path.display()))?;
        Ok(())
    }
}

/// Row indices of a label-balanced sample.
///
/// Each label gets `sample_size / 3` rows, the first `sample_size % 3`
/// labels one more, capped by how many rows carry that label. Buckets are
/// shuffled with `seed` and interleaved so any prefix stays balanced.
/// Unlabelled rows are never sampled.
pub fn balanced_sample(
    labels: &[Option<ConcentrationType>],
    sample_size: usize,
    seed: u64,
) -> Vec<usize> {
    let mut buckets: [Vec<usize>; 3] = Default::default();
    for (idx, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            buckets[label.code() as usize].push(idx);
        }
    }

    let per_label = sample_size / 3;
    let remainder = sample_size % 3;
    let mut rng = StdRng::seed_from_u64(seed);

    for (code, bucket) in buckets.iter_mut().enumerate() {
        bucket.shuffle(&mut rng);
        bucket.truncate(per_label + usize::from(code < remainder));
    }

    let longest = buckets.iter().map(Vec::len).max().unwrap_or(0);
    let mut sample = Vec::with_capacity(buckets.iter().map(Vec::len).sum());
    for i in 0..longest {
        for bucket in &buckets {
            if let Some(&idx) = bucket.get(i) {
                sample.push(idx);
            }
        }
    }
    sample
}

/// Build a `FeatureCollection` from a classified table.
///
/// Sampled rows without a city or state, or whose state has no
/// coordinates, are counted as failed and skipped.
pub fn build_feature_collection(
    df: &DataFrame,
    settings: &ExportSettings,
) -> Result<FeatureCollection> {
    require_columns(df, &[STATE, CONCENTRATION_TYPE])?;

    let labels = concentration_labels(df)?;
    let distribution = ConcentrationDistribution::from_table(df)?;

    let states = optional_text(df, STATE)?;
    let cities = optional_text(df, CITY)?;
    let vehicle_types = optional_text(df, VEHICLE_TYPE)?;
    let fuel_types = optional_text(df, FUEL_TYPE)?;
    let descriptions = optional_text(df, CONCENTRATION_DESCRIPTION)?;
    let counts = optional_int(df, VEHICLE_COUNT)?;
    let classes = optional_int(df, VEHICLE_CLASS)?;

    let sample = balanced_sample(&labels, settings.sample_size, settings.seed);

    let mut features = Vec::new();
    let mut approximate = 0;
    let mut failed = 0;

    for &idx in &sample {
        if features.len() >= settings.max_features {
            break;
        }

        let city = text_at(&cities, idx);
        let state = text_at(&states, idx);
        let (Some(city), Some(state)) = (city, state) else {
            failed += 1;
            continue;
        };
        let Some(location) = locate(&city, &state) else {
            failed += 1;
            continue;
        };
        let Some(label) = labels[idx] else {
            continue;
        };

        let is_approximate = matches!(location, LocationMatch::State(_));
        if is_approximate {
            approximate += 1;
        }
        let point = location.coordinates();

        features.push(Feature {
            kind: "Feature",
            geometry: PointGeometry {
                kind: "Point",
                coordinates: [point.lon, point.lat],
            },
            properties: FeatureProperties {
                city,
                state,
                vehicle_count: int_at(&counts, idx),
                vehicle_class: int_at(&classes, idx),
                vehicle_type: text_at(&vehicle_types, idx),
                fuel_type: text_at(&fuel_types, idx),
                concentration_type: label.code(),
                concentration_description: text_at(&descriptions, idx)
                    .unwrap_or_else(|| label.description().to_string()),
                approximate: is_approximate,
            },
        });
    }

    let concentration_distribution = ConcentrationType::ALL
        .iter()
        .map(|label| {
            (
                format!("{} ({})", label.description(), label.code()),
                distribution.count(*label),
            )
        })
        .collect();

    let processed = features.len();
    Ok(FeatureCollection {
        kind: "FeatureCollection",
        features,
        metadata: ExportMetadata {
            total_records: df.height(),
            sampled_records: sample.len(),
            processed,
            approximate,
            failed,
            concentration_distribution,
            generated_at: Utc::now().to_rfc3339(),
        },
    })
}

fn optional_text(df: &DataFrame, column: &str) -> Result<Option<Vec<Option<String>>>> {
    let Ok(col) = df.column(column) else {
        return Ok(None);
    };
    let values = col
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' must be text", column))?
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
        .collect();
    Ok(Some(values))
}

fn optional_int(df: &DataFrame, column: &str) -> Result<Option<Vec<Option<i64>>>> {
    let Ok(col) = df.column(column) else {
        return Ok(None);
    };
    let values = col
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' must be integer", column))?
        .i64()?
        .into_iter()
        .collect();
    Ok(Some(values))
}

fn text_at(values: &Option<Vec<Option<String>>>, idx: usize) -> Option<String> {
    values.as_ref().and_then(|v| v[idx].clone())
}

fn int_at(values: &Option<Vec<Option<i64>>>, idx: usize) -> Option<i64> {
    values.as_ref().and_then(|v| v[idx])
}
