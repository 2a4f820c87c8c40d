use std::fs;
use std::path::Path;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use menu_price_optimizer_rs::cli::{Cli, Command, InputArgs, OutputArgs};
use menu_price_optimizer_rs::config::{load_params, save_params};
use menu_price_optimizer_rs::data::{
    generate_sales, load_model, sample_elasticity, sample_menu, save_elasticity, save_menu,
    save_sales,
};
use menu_price_optimizer_rs::error::Result;
use menu_price_optimizer_rs::interface::{
    display_fitness_trace, display_report, prompt_select_changes, prompt_yes_no,
};
use menu_price_optimizer_rs::logging;
use menu_price_optimizer_rs::market::DomainModel;
use menu_price_optimizer_rs::report::{write_price_changes_csv, write_report_json};
use menu_price_optimizer_rs::search::{
    optimize, AnnealingParams, GeneticParams, HillClimbingParams, Optimization, Strategy,
    StrategyParams,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::HillClimb {
            input,
            output,
            max_iterations,
            step_size,
            plateau_iterations,
        } => {
            let params = StrategyParams::HillClimbing(HillClimbingParams {
                max_iterations,
                step_size,
                plateau_iterations,
            });
            cmd_optimize(&input, &output, &params)
        }
        Command::Anneal {
            input,
            output,
            initial_temp,
            cooling_rate,
            min_temp,
            max_iterations,
            step_size,
        } => {
            let params = StrategyParams::SimulatedAnnealing(AnnealingParams {
                initial_temp,
                cooling_rate,
                min_temp,
                max_iterations,
                step_size,
            });
            cmd_optimize(&input, &output, &params)
        }
        Command::Genetic {
            input,
            output,
            population_size,
            elite_size,
            mutation_rate,
            crossover_rate,
            max_generations,
            convergence_threshold,
            time_limit,
        } => {
            let params = StrategyParams::GeneticAlgorithm(GeneticParams {
                population_size,
                elite_size,
                mutation_rate,
                crossover_rate,
                max_generations,
                convergence_threshold,
                time_limit_secs: time_limit,
            });
            cmd_optimize(&input, &output, &params)
        }
        Command::Run {
            params,
            input,
            output,
        } => {
            let params = load_params(&params)?;
            cmd_optimize(&input, &output, &params)
        }
        Command::Params { strategy, out } => cmd_params(&strategy, &out),
        Command::Sample {
            out_dir,
            orders,
            seed,
        } => cmd_sample(&out_dir, orders, seed),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run one strategy against the loaded data and report the result.
fn cmd_optimize(input: &InputArgs, output: &OutputArgs, params: &StrategyParams) -> Result<()> {
    let model = load_model(&input.paths(), input.strict)?;
    println!(
        "Loaded {} menu items and {} orders",
        model.len(),
        model.order_count()
    );

    if model.is_empty() {
        println!("Menu is empty, nothing to optimize.");
        return Ok(());
    }

    let mut rng = make_rng(input.seed);
    let result = optimize(&model, params, &mut rng)?;

    display_report(&result.report);
    if let Some(history) = &result.report.fitness_history {
        display_fitness_trace(history);
    }

    if let Some(path) = &output.json {
        write_report_json(&result.report, path)?;
        println!("Wrote report to {}", path.display());
    }
    if let Some(path) = &output.csv {
        write_price_changes_csv(&result.report, path)?;
        println!("Wrote price changes to {}", path.display());
    }
    if let Some(path) = &output.apply {
        apply_changes(&model, &result, path, output.yes)?;
    }

    Ok(())
}

/// Write the menu with accepted price changes to `path`.
fn apply_changes(model: &DomainModel, result: &Optimization, path: &Path, yes: bool) -> Result<()> {
    let changes = &result.report.price_changes;
    if changes.is_empty() {
        println!("No price changes to apply.");
        return Ok(());
    }

    let accepted = if yes {
        changes.iter().map(|c| c.item_id).collect()
    } else {
        prompt_select_changes(changes)?
    };

    if accepted.is_empty() {
        println!("No changes selected.");
        return Ok(());
    }

    if !yes {
        let prompt = format!("Write {} new prices to {}?", accepted.len(), path.display());
        if !prompt_yes_no(&prompt, true)? {
            return Ok(());
        }
    }

    let mut prices = model.baseline().clone();
    for id in &accepted {
        if let Some(idx) = model.index_of(*id) {
            prices.set_price(idx, result.best_state.price(idx));
        }
    }

    save_menu(path, &model.apply(&prices))?;
    info!(applied = accepted.len(), path = %path.display(), "applied price changes");
    println!("Applied {} price changes to {}", accepted.len(), path.display());

    Ok(())
}

/// Write a strategy's default parameters so they can be edited and run.
fn cmd_params(strategy: &str, out: &Path) -> Result<()> {
    let strategy: Strategy = strategy.parse()?;
    save_params(out, &strategy.default_params())?;
    println!("Wrote {} defaults to {}", strategy.label(), out.display());
    Ok(())
}

/// Generate the sample café data set.
fn cmd_sample(out_dir: &Path, orders: u32, seed: Option<u64>) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let menu = sample_menu();
    let mut rng = make_rng(seed);
    let sales = generate_sales(&menu, orders, &mut rng);

    if sales.is_empty() {
        warn!("no sales generated");
    }

    save_menu(out_dir.join("menu.json"), &menu)?;
    save_sales(out_dir.join("sales.csv"), &sales)?;
    save_elasticity(out_dir.join("elasticity.json"), &sample_elasticity())?;

    println!(
        "Wrote {} menu items and {} sales records to {}",
        menu.len(),
        sales.len(),
        out_dir.display()
    );
    Ok(())
}
