use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::report::ComparisonReport;
use crate::search::Optimization;

/// Round a float to n decimal places.
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Write the full report, fitness history included, as pretty JSON.
pub fn write_report_json(report: &ComparisonReport, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;
    Ok(())
}

/// Write the price change table to a CSV file.
pub fn write_price_changes_csv(report: &ComparisonReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "item_id",
        "name",
        "old_price",
        "new_price",
        "change",
        "change_percentage",
    ])?;

    for change in &report.price_changes {
        wtr.write_record([
            change.item_id.to_string(),
            change.name.clone(),
            format!("{:.0}", change.old_price),
            format!("{:.0}", change.new_price),
            format!("{:.0}", change.change),
            format!("{:.2}", change.change_percentage),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// One line of a multi-seed strategy comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub seed: u64,
    pub strategy: String,
    pub current_revenue: f64,
    pub optimized_revenue: f64,
    pub improvement_percentage: f64,
    pub execution_time_secs: f64,
    pub iterations: usize,
    pub changed_items: usize,
}

impl ComparisonRow {
    pub fn new(seed: u64, optimization: &Optimization) -> Self {
        let report = &optimization.report;
        Self {
            seed,
            strategy: optimization.strategy.name().to_string(),
            current_revenue: round_to(report.current_revenue, 2),
            optimized_revenue: round_to(report.optimized_revenue, 2),
            improvement_percentage: round_to(report.improvement_percentage, 3),
            execution_time_secs: round_to(report.execution_time_secs, 6),
            iterations: report.iterations,
            changed_items: report.price_changes.len(),
        }
    }
}

/// Write comparison rows to a CSV file, header derived from the row fields.
pub fn write_comparison_csv(rows: &[ComparisonRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
