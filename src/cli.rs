use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::InputPaths;

/// Menu price optimizer: searches for menu prices that maximize predicted
/// revenue from historical sales, elasticity and cross-selling.
#[derive(Parser, Debug)]
#[command(name = "menu_price_optimizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Optimize prices with hill climbing.
    HillClimb {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Maximum number of iterations.
        #[arg(long, default_value_t = 1000)]
        max_iterations: usize,

        /// Maximum relative price move per step.
        #[arg(long, default_value_t = 0.05)]
        step_size: f64,

        /// Stop after this many non-improving iterations in a row.
        #[arg(long, default_value_t = 100)]
        plateau_iterations: usize,
    },

    /// Optimize prices with simulated annealing.
    Anneal {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        #[arg(long, default_value_t = 1.0)]
        initial_temp: f64,

        /// Temperature multiplier per iteration, in (0, 1).
        #[arg(long, default_value_t = 0.995)]
        cooling_rate: f64,

        #[arg(long, default_value_t = 0.01)]
        min_temp: f64,

        #[arg(long, default_value_t = 10_000)]
        max_iterations: usize,

        #[arg(long, default_value_t = 0.05)]
        step_size: f64,
    },

    /// Optimize prices with a genetic algorithm.
    Genetic {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        #[arg(long, default_value_t = 50)]
        population_size: usize,

        /// Best individuals copied unchanged into each generation.
        #[arg(long, default_value_t = 5)]
        elite_size: usize,

        /// Per-gene mutation probability.
        #[arg(long, default_value_t = 0.1)]
        mutation_rate: f64,

        #[arg(long, default_value_t = 0.8)]
        crossover_rate: f64,

        #[arg(long, default_value_t = 100)]
        max_generations: usize,

        /// Stop after this many generations without improvement.
        #[arg(long, default_value_t = 20)]
        convergence_threshold: usize,

        /// Wall-clock limit in seconds.
        #[arg(long)]
        time_limit: Option<f64>,
    },

    /// Optimize prices with a strategy and parameters read from a JSON file.
    Run {
        /// Parameters file, e.g. {"strategy": "genetic_algorithm", "population_size": 80}.
        #[arg(short, long)]
        params: PathBuf,

        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write the default parameters of a strategy to a JSON file.
    Params {
        /// Strategy name (hill_climbing, simulated_annealing, genetic_algorithm).
        strategy: String,

        #[arg(short, long, default_value = "params.json")]
        out: PathBuf,
    },

    /// Generate a sample café menu, sales history and elasticity table.
    Sample {
        /// Directory to write menu.json, sales.csv and elasticity.json into.
        #[arg(default_value = ".")]
        out_dir: PathBuf,

        /// Number of orders to generate.
        #[arg(long, default_value_t = 200)]
        orders: u32,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Menu catalog (JSON array of {id, name, price}).
    #[arg(short, long, default_value = "menu.json")]
    pub menu: PathBuf,

    /// Sales history (CSV, or JSON when the extension is .json).
    #[arg(short, long, default_value = "sales.csv")]
    pub sales: PathBuf,

    /// Elasticity table (JSON object keyed by item id).
    #[arg(short, long)]
    pub elasticity: Option<PathBuf>,

    /// Price bounds (JSON object of item id to [min, max]).
    #[arg(short, long)]
    pub bounds: Option<PathBuf>,

    /// Reject sales records for items missing from the menu.
    #[arg(long)]
    pub strict: bool,

    /// Random seed for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl InputArgs {
    pub fn paths(&self) -> InputPaths {
        InputPaths {
            menu: self.menu.clone(),
            sales: self.sales.clone(),
            elasticity: self.elasticity.clone(),
            bounds: self.bounds.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the full report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the price changes as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the menu with the accepted new prices to this file.
    #[arg(long)]
    pub apply: Option<PathBuf>,

    /// Accept every proposed change without prompting.
    #[arg(short, long)]
    pub yes: bool,
}
