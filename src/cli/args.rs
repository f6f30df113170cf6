//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{ConcentrationProportions, Stage, DEFAULT_SEED};
use crate::report::{ExportSettings, DEFAULT_MAX_FEATURES, DEFAULT_SAMPLE_SIZE};

/// Raw fleet dataset read by the enrichment stage
pub const DEFAULT_RAW_FILE: &str = "vehicle_demo_data.csv";

/// Enhanced dataset produced by enrichment and rewritten by later stages
pub const DEFAULT_ENHANCED_FILE: &str = "vehicle_demo_data_enhanced.csv";

/// Map data written by the GeoJSON export
pub const DEFAULT_GEOJSON_FILE: &str = "vehicles-heatmap-data.geojson";

/// fleet-enrich - Add regions and concentration labels to vehicle fleet datasets
#[derive(Parser, Debug)]
#[command(name = "fleet-enrich")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory relative input/output paths are resolved against
    #[arg(long, global = true, default_value = "public")]
    pub data_dir: PathBuf,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, global = true, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Write a JSON report of the executed stage(s) to this path
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// Skip the confirmation prompt before overwriting a file in place
    #[arg(long, global = true, default_value = "false")]
    pub no_confirm: bool,

    /// Fail when a state has no region mapping instead of warning
    #[arg(long, global = true, default_value = "false")]
    pub strict_regions: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage 1: assign regions and the initial concentration classification
    Enrich {
        /// Input file path (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_RAW_FILE)]
        input: PathBuf,

        /// Output file path (CSV or Parquet, determined by extension)
        #[arg(short, long, default_value = DEFAULT_ENHANCED_FILE)]
        output: PathBuf,
    },

    /// Stage 2: reclassify with revised thresholds and append synthetic records
    Refine {
        /// Input file path (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_ENHANCED_FILE)]
        input: PathBuf,

        /// Output file path. Defaults to overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stage 3: reassign concentration labels to hit fixed proportions
    Rebalance {
        /// Input file path (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_ENHANCED_FILE)]
        input: PathBuf,

        /// Output file path. Defaults to overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        rebalance: RebalanceArgs,
    },

    /// Run all three stages in order
    Run {
        /// Raw input file path (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_RAW_FILE)]
        input: PathBuf,

        /// Output file path, rewritten after every stage
        #[arg(short, long, default_value = DEFAULT_ENHANCED_FILE)]
        output: PathBuf,

        #[command(flatten)]
        rebalance: RebalanceArgs,
    },

    /// Export a classified table as a GeoJSON FeatureCollection for mapping
    Geojson {
        /// Classified input file path (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_ENHANCED_FILE)]
        input: PathBuf,

        /// GeoJSON output file path
        #[arg(short, long, default_value = DEFAULT_GEOJSON_FILE)]
        output: PathBuf,

        /// Rows to sample, split evenly across concentration labels
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,

        /// Maximum number of features written
        #[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
        max_features: usize,

        /// Seed for the sample shuffle
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

/// Rebalancing parameters
#[derive(Args, Debug, Clone)]
pub struct RebalanceArgs {
    /// Seed for the label shuffle
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Target proportions as "highly,substantially,national", summing to 1.0
    #[arg(long, default_value = "0.5,0.3,0.2")]
    pub proportions: ConcentrationProportions,
}

/// A resolved GeoJSON export request
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub settings: ExportSettings,
}

/// One stage to execute with its resolved files
#[derive(Debug, Clone, PartialEq)]
pub struct StagePlan {
    pub stage: Stage,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Cli {
    /// Resolve a path against the data directory unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Stages to run, in order, with resolved input and output paths.
    ///
    /// For `run`, the first stage reads the raw input and every stage
    /// writes the output; later stages continue from that output. The
    /// GeoJSON export runs no stages.
    pub fn plan(&self) -> Vec<StagePlan> {
        match &self.command {
            Commands::Enrich { input, output, .. } => vec![StagePlan {
                stage: Stage::Enrich,
                input: self.resolve(input),
                output: self.resolve(output),
            }],
            Commands::Refine { input, output } => vec![StagePlan {
                stage: Stage::Refine,
                input: self.resolve(input),
                output: self.resolve(output.as_deref().unwrap_or(input)),
            }],
            Commands::Rebalance { input, output, .. } => vec![StagePlan {
                stage: Stage::Rebalance,
                input: self.resolve(input),
                output: self.resolve(output.as_deref().unwrap_or(input)),
            }],
            Commands::Geojson { .. } => Vec::new(),
            Commands::Run { input, output, .. } => {
                let input = self.resolve(input);
                let output = self.resolve(output);
                Stage::ALL
                    .into_iter()
                    .map(|stage| StagePlan {
                        stage,
                        input: if stage == Stage::Enrich {
                            input.clone()
                        } else {
                            output.clone()
                        },
                        output: output.clone(),
                    })
                    .collect()
            }
        }
    }

    /// The GeoJSON export to perform, if that command was given
    pub fn export(&self) -> Option<ExportPlan> {
        match &self.command {
            Commands::Geojson {
                input,
                output,
                sample_size,
                max_features,
                seed,
            } => Some(ExportPlan {
                input: self.resolve(input),
                output: self.resolve(output),
                settings: ExportSettings {
                    sample_size: *sample_size,
                    max_features: *max_features,
                    seed: *seed,
                },
            }),
            _ => None,
        }
    }

    /// Strict region mode, only consulted by the enrichment stage
    pub fn strict_regions(&self) -> bool {
        self.strict_regions
    }

    /// Rebalancing parameters, defaulted for commands that don't take them
    pub fn rebalance(&self) -> (u64, ConcentrationProportions) {
        match &self.command {
            Commands::Rebalance { rebalance, .. } | Commands::Run { rebalance, .. } => {
                (rebalance.seed, rebalance.proportions)
            }
            _ => (DEFAULT_SEED, ConcentrationProportions::default()),
        }
    }
}
