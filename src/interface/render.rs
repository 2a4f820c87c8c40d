use crate::report::ComparisonReport;
use crate::search::Optimization;

/// Width of the generation trace bars.
const TRACE_WIDTH: usize = 40;

/// Display the summary and price change table of a report.
pub fn display_report(report: &ComparisonReport) {
    println!();
    println!("=== {} ===", report.strategy.label());
    println!();
    println!("Current revenue:   {:>16.0}", report.current_revenue);
    println!("Optimized revenue: {:>16.0}", report.optimized_revenue);
    let sign = if report.improvement >= 0.0 { "+" } else { "" };
    println!(
        "Improvement:       {:>16} ({}{:.2}%)",
        format!("{}{:.0}", sign, report.improvement),
        sign,
        report.improvement_percentage
    );
    match report.generations {
        Some(generations) => println!("Generations:       {:>16}", generations),
        None => println!("Iterations:        {:>16}", report.iterations),
    }
    println!("Execution time:    {:>15.4}s", report.execution_time_secs);
    println!();

    display_price_changes(report);
}

/// Display the per-item price changes, largest relative change first.
pub fn display_price_changes(report: &ComparisonReport) {
    if report.price_changes.is_empty() {
        println!("No price changes proposed (current prices are already the best found).");
        println!();
        return;
    }

    let max_name_len = report
        .price_changes
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(10);

    println!(
        "--- Price changes ({} up, {} down) ---",
        report.increases(),
        report.decreases()
    );
    for (i, change) in report.price_changes.iter().enumerate() {
        let sign = if change.change >= 0.0 { "+" } else { "" };
        println!(
            "{:>3}. {:<width$} {:>9.0} -> {:>9.0}  {}{:.0} ({}{:.1}%)",
            i + 1,
            change.name,
            change.old_price,
            change.new_price,
            sign,
            change.change,
            sign,
            change.change_percentage,
            width = max_name_len
        );
    }
    println!();
}

/// Display the best fitness per generation as a text bar chart.
pub fn display_fitness_trace(history: &[f64]) {
    if history.is_empty() {
        return;
    }

    let min = history.iter().copied().fold(f64::INFINITY, f64::min);
    let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    println!("--- Best fitness per generation ---");
    for (generation, fitness) in history.iter().enumerate() {
        let filled = if span > 0.0 {
            1 + (((fitness - min) / span) * (TRACE_WIDTH - 1) as f64).round() as usize
        } else {
            TRACE_WIDTH
        };
        println!(
            "{:>4} {:<width$} {:.0}",
            generation,
            "#".repeat(filled),
            fitness,
            width = TRACE_WIDTH
        );
    }
    println!();
}

/// Display several optimizations side by side.
pub fn display_comparison_table(results: &[Optimization]) {
    if results.is_empty() {
        return;
    }

    println!();
    println!("=== Strategy comparison ===");
    println!();
    println!(
        "{:<20} {:>16} {:>14} {:>12} {:>8}",
        "Strategy", "Revenue", "Improvement", "Time (s)", "Changes"
    );
    for result in results {
        let report = &result.report;
        println!(
            "{:<20} {:>16.0} {:>13.2}% {:>12.4} {:>8}",
            result.strategy.label(),
            report.optimized_revenue,
            report.improvement_percentage,
            report.execution_time_secs,
            report.price_changes.len()
        );
    }

    if let Some(best) = results
        .iter()
        .max_by(|a, b| a.best_value.total_cmp(&b.best_value))
    {
        println!();
        println!("Best: {} ({:.0})", best.strategy.label(), best.best_value);
    }
    println!();
}
