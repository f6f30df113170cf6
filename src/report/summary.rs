//! Concentration distribution summaries printed after each stage

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{
    concentration_labels, ConcentrationType, StageOutcome, REGION, VEHICLE_CLASS,
};

/// Group label used for rows without a region
pub const UNASSIGNED_REGION: &str = "Unassigned";

/// Counts per concentration code (index = code)
pub type LabelCounts = [usize; 3];

/// Concentration label counts overall, by vehicle class and by region
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConcentrationDistribution {
    pub total_rows: usize,
    pub overall: LabelCounts,
    pub by_class: BTreeMap<String, LabelCounts>,
    pub by_region: BTreeMap<String, LabelCounts>,
    /// Rows whose `Concentration_Type` is null
    pub unlabeled: usize,
}

impl ConcentrationDistribution {
    /// Tally the classification columns of `df`.
    ///
    /// Class and region breakdowns are skipped when those columns are absent.
    pub fn from_table(df: &DataFrame) -> Result<Self> {
        let labels = concentration_labels(df)?;

        let classes: Option<Vec<Option<i64>>> = match df.column(VEHICLE_CLASS) {
            Ok(col) => Some(
                col.cast(&DataType::Int64)
                    .with_context(|| format!("Column '{}' must be integer", VEHICLE_CLASS))?
                    .i64()?
                    .into_iter()
                    .collect(),
            ),
            Err(_) => None,
        };

        let regions: Option<Vec<Option<String>>> = match df.column(REGION) {
            Ok(col) => Some(
                col.cast(&DataType::String)?
                    .str()?
                    .into_iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
            Err(_) => None,
        };

        let mut dist = ConcentrationDistribution {
            total_rows: df.height(),
            ..Default::default()
        };

        for (idx, label) in labels.iter().enumerate() {
            let Some(label) = label else {
                dist.unlabeled += 1;
                continue;
            };
            let code = label.code() as usize;
            dist.overall[code] += 1;

            if let Some(classes) = &classes {
                let key = classes[idx]
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "null".to_string());
                dist.by_class.entry(key).or_default()[code] += 1;
            }

            if let Some(regions) = &regions {
                let key = regions[idx]
                    .clone()
                    .unwrap_or_else(|| UNASSIGNED_REGION.to_string());
                dist.by_region.entry(key).or_default()[code] += 1;
            }
        }

        Ok(dist)
    }

    pub fn count(&self, label: ConcentrationType) -> usize {
        self.overall[label.code() as usize]
    }

    /// Print the overall, per-class and per-region tables
    pub fn display(&self) {
        print_section("CONCENTRATION DISTRIBUTION");
        print_indented(&self.overall_table());

        if !self.by_class.is_empty() {
            print_section("BY VEHICLE CLASS");
            print_indented(&breakdown_table("Class", &self.by_class));
        }

        if !self.by_region.is_empty() {
            print_section("BY REGION");
            print_indented(&breakdown_table("Region", &self.by_region));
        }
    }

    fn overall_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Concentration").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Share").add_attribute(Attribute::Bold),
        ]);

        for label in ConcentrationType::ALL {
            let count = self.count(label);
            table.add_row(vec![
                Cell::new(format!("{} ({})", label.description(), label.code())),
                Cell::new(count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}%", percent(count, self.total_rows)))
                    .fg(label_color(label))
                    .set_alignment(CellAlignment::Right),
            ]);
        }

        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(self.total_rows)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new(""),
        ]);

        table
    }
}

/// Print the row counts for a finished stage followed by its distribution
pub fn display_stage_summary(outcome: &StageOutcome, distribution: &ConcentrationDistribution) {
    print_section(&format!("{} SUMMARY", outcome.stage.title().to_uppercase()));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("📁 Input Rows"), Cell::new(outcome.rows_in)]);
    table.add_row(vec![
        Cell::new("➕ Rows Added"),
        Cell::new(outcome.rows_added).fg(if outcome.rows_added == 0 {
            Color::White
        } else {
            Color::Yellow
        }),
    ]);
    table.add_row(vec![
        Cell::new("🗺️  Unmapped States"),
        Cell::new(outcome.unmapped_states.len()).fg(if outcome.unmapped_states.is_empty() {
            Color::White
        } else {
            Color::Red
        }),
    ]);
    table.add_row(vec![
        Cell::new("✅ Output Rows"),
        Cell::new(outcome.table.height())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    print_indented(&table);
    distribution.display();
}

fn breakdown_table(group: &str, rows: &BTreeMap<String, LabelCounts>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new(group).add_attribute(Attribute::Bold)];
    header.extend(
        ConcentrationType::ALL
            .iter()
            .map(|l| Cell::new(l.description()).add_attribute(Attribute::Bold)),
    );
    header.push(Cell::new("Rows").add_attribute(Attribute::Bold));
    table.set_header(header);

    for (key, counts) in rows {
        let total: usize = counts.iter().sum();
        let mut row = vec![Cell::new(key)];
        row.extend(counts.iter().map(|&c| {
            Cell::new(format!("{} ({:.1}%)", c, percent(c, total)))
                .set_alignment(CellAlignment::Right)
        }));
        row.push(Cell::new(total).set_alignment(CellAlignment::Right));
        table.add_row(row);
    }

    table
}

fn label_color(label: ConcentrationType) -> Color {
    match label {
        ConcentrationType::HighlyConcentrated => Color::Red,
        ConcentrationType::SubstantiallyConcentrated => Color::Yellow,
        ConcentrationType::National => Color::Cyan,
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn print_section(title: &str) {
    println!();
    println!("    {} {}", style("📋").cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_counts() {
        let df = df! {
            "Vehicle_Class" => [6i64, 6, 7, 8],
            "Region" => [Some("West"), None, Some("West"), Some("South")],
            "Concentration_Type" => [0i64, 2, 0, 1],
            "Concentration_Description" => ["Highly Concentrated", "National", "Highly Concentrated", "Substantially Concentrated"],
        }
        .unwrap();

        let dist = ConcentrationDistribution::from_table(&df).unwrap();
        assert_eq!(dist.total_rows, 4);
        assert_eq!(dist.overall, [2, 1, 1]);
        assert_eq!(dist.by_class["6"], [1, 0, 1]);
        assert_eq!(dist.by_region["West"], [2, 0, 0]);
        assert_eq!(dist.by_region[UNASSIGNED_REGION], [0, 0, 1]);
        assert_eq!(dist.unlabeled, 0);
    }

    #[test]
    fn test_distribution_without_breakdown_columns() {
        let df = df! {
            "Concentration_Type" => [Some(1i64), None],
        }
        .unwrap();

        let dist = ConcentrationDistribution::from_table(&df).unwrap();
        assert_eq!(dist.overall, [0, 1, 0]);
        assert_eq!(dist.unlabeled, 1);
        assert!(dist.by_class.is_empty());
        assert!(dist.by_region.is_empty());
    }

    #[test]
    fn test_percent_handles_zero_total() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
