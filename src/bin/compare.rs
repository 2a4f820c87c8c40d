use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use menu_price_optimizer_rs::data::{load_model, InputPaths};
use menu_price_optimizer_rs::interface::display_comparison_table;
use menu_price_optimizer_rs::logging;
use menu_price_optimizer_rs::report::{write_comparison_csv, ComparisonRow};
use menu_price_optimizer_rs::search::{compare_strategies, Strategy, StrategyParams};

#[derive(Parser, Debug)]
#[command(name = "compare")]
#[command(about = "Run every pricing strategy over several seeds and compare them")]
struct Args {
    /// Menu catalog JSON
    #[arg(long, default_value = "menu.json")]
    menu: PathBuf,

    /// Sales history (CSV or JSON)
    #[arg(long, default_value = "sales.csv")]
    sales: PathBuf,

    /// Elasticity table JSON
    #[arg(long)]
    elasticity: Option<PathBuf>,

    /// Price bounds JSON
    #[arg(long)]
    bounds: Option<PathBuf>,

    /// Reject sales for items missing from the menu
    #[arg(long)]
    strict: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1,2,3")]
    seeds: String,

    /// Output CSV file for all runs
    #[arg(long, default_value = "comparison.csv")]
    csv: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_seeds(s: &str) -> Vec<u64> {
    s.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let paths = InputPaths {
        menu: args.menu.clone(),
        sales: args.sales.clone(),
        elasticity: args.elasticity.clone(),
        bounds: args.bounds.clone(),
    };
    let model = match load_model(&paths, args.strict) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Loaded {} menu items and {} orders",
        model.len(),
        model.order_count()
    );

    let seeds = parse_seeds(&args.seeds);
    if seeds.is_empty() {
        eprintln!("Error: no valid seeds provided");
        std::process::exit(1);
    }
    println!("Testing seeds: {:?}", seeds);

    let params: Vec<StrategyParams> = Strategy::ALL.iter().map(|s| s.default_params()).collect();
    let mut rows = Vec::new();

    for &seed in &seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        let results = match compare_strategies(&model, &params, &mut rng) {
            Ok(results) => results,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

        println!();
        println!("--- Seed {} ---", seed);
        display_comparison_table(&results);

        rows.extend(results.iter().map(|r| ComparisonRow::new(seed, r)));
    }

    // Averages across seeds
    let mut totals: BTreeMap<&str, (f64, f64, usize)> = BTreeMap::new();
    for row in &rows {
        let entry = totals.entry(row.strategy.as_str()).or_insert((0.0, 0.0, 0));
        entry.0 += row.improvement_percentage;
        entry.1 += row.execution_time_secs;
        entry.2 += 1;
    }

    println!("=== Averages over {} seeds ===", seeds.len());
    for strategy in Strategy::ALL {
        if let Some((improvement, time, count)) = totals.get(strategy.name()) {
            let n = *count as f64;
            println!(
                "{:<20} improvement {:>+8.2}%  time {:>8.4}s",
                strategy.label(),
                improvement / n,
                time / n
            );
        }
    }
    println!();

    if let Err(e) = write_comparison_csv(&rows, &args.csv) {
        eprintln!("Error writing CSV: {}", e);
        std::process::exit(1);
    }
    println!("Wrote all runs to {:?}", args.csv);
}
