//! fleet-enrich: Fleet Dataset Enrichment CLI Tool
//!
//! Runs the region/concentration enrichment stages against fleet CSV files,
//! reading each stage's input from disk and writing its output back.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use polars::prelude::DataFrame;

use fleet_enrich::cli::{confirm_overwrite, Cli, ExportPlan, StagePlan};
use fleet_enrich::pipeline::{
    enrich_geography, load_table, rebalance_distribution, refine_thresholds, save_table,
    ConcentrationProportions, ConcentrationType, Stage, StageOutcome,
};
use fleet_enrich::report::{
    build_feature_collection, display_stage_summary, ConcentrationDistribution, RunReport,
    StageReportEntry,
};
use fleet_enrich::utils::{
    print_banner, print_completion, print_info, print_stage_config, print_step_header,
    print_step_time, print_success, print_targets, print_warning, with_spinner,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(export) = cli.export() {
        return run_export(&cli, &export);
    }

    let plan = cli.plan();
    let strict_regions = cli.strict_regions();
    let (seed, proportions) = cli.rebalance();

    // A single refine/rebalance invocation rewrites its own input
    if let [step] = plan.as_slice() {
        if step.stage != Stage::Enrich
            && step.input == step.output
            && !cli.no_confirm
            && console::Term::stdout().is_term()
            && !confirm_overwrite(step.stage, &step.output)?
        {
            println!("Cancelled by user.");
            return Ok(());
        }
    }

    print_banner(env!("CARGO_PKG_VERSION"));

    let mut report = RunReport::new();
    let mut carried: Option<DataFrame> = None;

    for step in &plan {
        print_step_header(step.stage.number(), step.stage.title());
        print_stage_config(&step.input, &step.output, &stage_settings(step, strict_regions, seed, &proportions));

        let step_start = Instant::now();

        let df = match carried.take() {
            Some(df) => df,
            None => with_spinner("Loading dataset...", "Dataset loaded", || {
                load_table(&step.input, cli.infer_schema_length)
            })?,
        };
        let (rows, cols) = df.shape();
        print_info(&format!("{} rows × {} columns", rows, cols));

        let mut outcome = with_spinner(
            &format!("Running {}...", step.stage.title().to_lowercase()),
            &format!("{} complete", step.stage.title()),
            || run_stage(step.stage, &df, strict_regions, seed, &proportions),
        )?;

        report_stage_details(&outcome);

        let output = step.output.clone();
        with_spinner(
            "Writing output file...",
            &format!("Saved to {}", output.display()),
            || save_table(&mut outcome.table, &output),
        )?;

        let distribution = ConcentrationDistribution::from_table(&outcome.table)?;
        display_stage_summary(&outcome, &distribution);

        let rebalance = (step.stage == Stage::Rebalance).then_some((seed, proportions));
        report.push(StageReportEntry::new(
            &outcome,
            distribution,
            &step.input,
            &step.output,
            rebalance,
        ));

        print_step_time(step_start.elapsed());
        carried = Some(outcome.table);
    }

    if let Some(path) = &cli.report {
        report.write(path)?;
        print_success(&format!("Run report written to {}", path.display()));
    }

    print_completion();

    Ok(())
}

fn run_export(cli: &Cli, export: &ExportPlan) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));
    print_stage_config(
        &export.input,
        &export.output,
        &[
            ("Sample", export.settings.sample_size.to_string()),
            ("Max points", export.settings.max_features.to_string()),
            ("Seed", export.settings.seed.to_string()),
        ],
    );

    if cli.report.is_some() {
        print_warning("Run reports cover enrichment stages; --report is ignored for GeoJSON export");
    }

    let start = Instant::now();

    let df = with_spinner("Loading dataset...", "Dataset loaded", || {
        load_table(&export.input, cli.infer_schema_length)
    })?;

    let collection = with_spinner("Placing sampled rows...", "Features built", || {
        build_feature_collection(&df, &export.settings)
    })?;

    with_spinner(
        "Writing GeoJSON...",
        &format!("Saved to {}", export.output.display()),
        || collection.write(&export.output),
    )?;

    let meta = &collection.metadata;
    print_info(&format!(
        "{} feature(s) from {} sampled of {} rows",
        meta.processed, meta.sampled_records, meta.total_records
    ));
    if meta.approximate > 0 {
        print_info(&format!("{} placed at a state centroid", meta.approximate));
    }
    if meta.failed > 0 {
        print_warning(&format!(
            "{} sampled row(s) skipped: missing city/state or unknown state",
            meta.failed
        ));
    }

    ConcentrationDistribution::from_table(&df)?.display();

    print_step_time(start.elapsed());
    print_completion();

    Ok(())
}

fn run_stage(
    stage: Stage,
    df: &DataFrame,
    strict_regions: bool,
    seed: u64,
    proportions: &ConcentrationProportions,
) -> Result<StageOutcome> {
    match stage {
        Stage::Enrich => enrich_geography(df, strict_regions),
        Stage::Refine => refine_thresholds(df),
        Stage::Rebalance => rebalance_distribution(df, proportions, seed),
    }
}

/// Parameter lines shown in the stage configuration card
fn stage_settings(
    step: &StagePlan,
    strict_regions: bool,
    seed: u64,
    proportions: &ConcentrationProportions,
) -> Vec<(&'static str, String)> {
    match step.stage {
        Stage::Enrich => vec![
            ("Thresholds", "share ≥8% / ≥3%".to_string()),
            ("Regions", if strict_regions { "strict" } else { "warn" }.to_string()),
        ],
        Stage::Refine => vec![("Thresholds", "share ≥15% / ≥5%".to_string())],
        Stage::Rebalance => vec![
            ("Seed", seed.to_string()),
            ("Proportions", proportions.to_string()),
        ],
    }
}

fn report_stage_details(outcome: &StageOutcome) {
    if !outcome.unmapped_states.is_empty() {
        print_warning(&format!(
            "{} state value(s) have no region and were left blank: {}",
            outcome.unmapped_states.len(),
            outcome.unmapped_states.join(", ")
        ));
    }

    if outcome.rows_added > 0 {
        print_success(&format!("Appended {} synthetic record(s)", outcome.rows_added));
    }

    if let Some(targets) = outcome.target_counts {
        let labelled: Vec<(&str, usize)> = ConcentrationType::ALL
            .iter()
            .map(|l| (l.description(), targets[l.code() as usize]))
            .collect();
        print_targets(&labelled, outcome.table.height());
    }
}
