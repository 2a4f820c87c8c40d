pub mod annealing;
pub mod genetic;
pub mod hill_climb;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::info;

use crate::error::{PricingError, Result};
use crate::market::DomainModel;
use crate::models::{ItemId, PriceAssignment};
use crate::report::ComparisonReport;

pub use annealing::{accept_move, simulated_annealing, AnnealingParams};
pub use genetic::{genetic_algorithm, GeneticParams};
pub use hill_climb::{hill_climb, HillClimbingParams};

/// The available search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    HillClimbing,
    SimulatedAnnealing,
    GeneticAlgorithm,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::HillClimbing,
        Strategy::SimulatedAnnealing,
        Strategy::GeneticAlgorithm,
    ];

    /// Canonical machine name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::HillClimbing => "hill_climbing",
            Strategy::SimulatedAnnealing => "simulated_annealing",
            Strategy::GeneticAlgorithm => "genetic_algorithm",
        }
    }

    /// Human-readable name for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::HillClimbing => "Hill Climbing",
            Strategy::SimulatedAnnealing => "Simulated Annealing",
            Strategy::GeneticAlgorithm => "Genetic Algorithm",
        }
    }

    /// Default parameters for this strategy.
    pub fn default_params(&self) -> StrategyParams {
        match self {
            Strategy::HillClimbing => StrategyParams::HillClimbing(HillClimbingParams::default()),
            Strategy::SimulatedAnnealing => {
                StrategyParams::SimulatedAnnealing(AnnealingParams::default())
            }
            Strategy::GeneticAlgorithm => {
                StrategyParams::GeneticAlgorithm(GeneticParams::default())
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = PricingError;

    /// Accepts canonical names, kebab-case and short aliases
    /// (`hc`, `sa`, `ga`). Anything else is an error naming the closest
    /// strategy.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace('-', "_");
        let strategy = match key.as_str() {
            "hill_climbing" | "hill_climb" | "hc" => Some(Strategy::HillClimbing),
            "simulated_annealing" | "annealing" | "anneal" | "sa" => {
                Some(Strategy::SimulatedAnnealing)
            }
            "genetic_algorithm" | "genetic" | "ga" => Some(Strategy::GeneticAlgorithm),
            _ => None,
        };

        strategy.ok_or_else(|| {
            let suggestion = Strategy::ALL
                .iter()
                .map(|st| (st.name(), jaro_winkler(st.name(), &key)))
                .filter(|(_, score)| *score > 0.7)
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(name, _)| name.to_string());
            PricingError::UnknownStrategy {
                name: s.to_string(),
                suggestion,
            }
        })
    }
}

/// Strategy selection together with its parameters.
///
/// Serialized with a `"strategy"` tag, e.g.
/// `{"strategy": "hill_climbing", "max_iterations": 500}`; omitted fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyParams {
    HillClimbing(HillClimbingParams),
    SimulatedAnnealing(AnnealingParams),
    GeneticAlgorithm(GeneticParams),
}

impl StrategyParams {
    pub fn strategy(&self) -> Strategy {
        match self {
            StrategyParams::HillClimbing(_) => Strategy::HillClimbing,
            StrategyParams::SimulatedAnnealing(_) => Strategy::SimulatedAnnealing,
            StrategyParams::GeneticAlgorithm(_) => Strategy::GeneticAlgorithm,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            StrategyParams::HillClimbing(p) => p.validate(),
            StrategyParams::SimulatedAnnealing(p) => p.validate(),
            StrategyParams::GeneticAlgorithm(p) => p.validate(),
        }
    }
}

/// Raw result of one search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: PriceAssignment,
    pub best_value: f64,
    /// Iterations (local search) or generations (genetic) completed.
    pub iterations: usize,
    /// Best value after the initial state and after every iteration.
    pub history: Vec<f64>,
}

/// A finished optimization: best prices, their revenue and the report.
#[derive(Debug, Clone)]
pub struct Optimization {
    pub strategy: Strategy,
    pub best_state: PriceAssignment,
    pub best_value: f64,
    pub report: ComparisonReport,
}

impl Optimization {
    /// Proposed prices keyed by item id.
    pub fn price_map(&self, model: &DomainModel) -> BTreeMap<ItemId, f64> {
        model.to_price_map(&self.best_state)
    }
}

/// Run the strategy selected by `params` and compare it to current prices.
pub fn optimize(
    model: &DomainModel,
    params: &StrategyParams,
    rng: &mut impl Rng,
) -> Result<Optimization> {
    params.validate()?;

    let strategy = params.strategy();
    let started = Instant::now();
    let outcome = match params {
        StrategyParams::HillClimbing(p) => hill_climb(model, p, rng),
        StrategyParams::SimulatedAnnealing(p) => simulated_annealing(model, p, rng),
        StrategyParams::GeneticAlgorithm(p) => genetic_algorithm(model, p, rng),
    };
    let elapsed = started.elapsed();

    let report = ComparisonReport::new(model, strategy, &outcome, elapsed);
    info!(
        strategy = strategy.name(),
        improvement = report.improvement,
        improvement_pct = report.improvement_percentage,
        changed = report.price_changes.len(),
        "optimization complete"
    );

    Ok(Optimization {
        strategy,
        best_state: outcome.best,
        best_value: outcome.best_value,
        report,
    })
}

/// Run several strategies on the same model, one after another.
///
/// Each run draws from the same random source in order, so a seeded `rng`
/// reproduces the whole comparison.
pub fn compare_strategies(
    model: &DomainModel,
    params: &[StrategyParams],
    rng: &mut impl Rng,
) -> Result<Vec<Optimization>> {
    params.iter().map(|p| optimize(model, p, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{evaluate, ModelOptions};
    use crate::models::{MenuItem, SalesRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_model() -> DomainModel {
        let menu = vec![
            MenuItem::new(1, "Black Coffee", 25000.0),
            MenuItem::new(2, "Croissant", 25000.0),
        ];
        let sales = vec![
            SalesRecord::new(1, 5, 1),
            SalesRecord::new(2, 2, 1),
            SalesRecord::new(1, 3, 2),
        ];
        DomainModel::new(menu, &sales, ModelOptions::default()).unwrap()
    }

    #[test]
    fn test_strategy_from_str_aliases() {
        assert_eq!("hill_climbing".parse::<Strategy>().unwrap(), Strategy::HillClimbing);
        assert_eq!("Hill-Climbing".parse::<Strategy>().unwrap(), Strategy::HillClimbing);
        assert_eq!("sa".parse::<Strategy>().unwrap(), Strategy::SimulatedAnnealing);
        assert_eq!("genetic".parse::<Strategy>().unwrap(), Strategy::GeneticAlgorithm);
    }

    #[test]
    fn test_unknown_strategy_suggests_closest() {
        let err = "simulated_anealing".parse::<Strategy>().unwrap_err();
        match err {
            PricingError::UnknownStrategy { name, suggestion } => {
                assert_eq!(name, "simulated_anealing");
                assert_eq!(suggestion.as_deref(), Some("simulated_annealing"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = "xyz".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, PricingError::UnknownStrategy { suggestion: None, .. }));
    }

    #[test]
    fn test_params_json_tagging_and_defaults() {
        let json = r#"{"strategy": "hill_climbing", "max_iterations": 250}"#;
        let params: StrategyParams = serde_json::from_str(json).unwrap();
        match params {
            StrategyParams::HillClimbing(p) => {
                assert_eq!(p.max_iterations, 250);
                assert_eq!(p.plateau_iterations, 100);
            }
            other => panic!("unexpected params: {other:?}"),
        }
    }

    #[test]
    fn test_optimize_rejects_invalid_params() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(1);
        let params = StrategyParams::GeneticAlgorithm(GeneticParams {
            population_size: 0,
            ..GeneticParams::default()
        });
        assert!(optimize(&model, &params, &mut rng).is_err());
    }

    #[test]
    fn test_optimize_report_matches_outcome() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(5);
        let params = Strategy::HillClimbing.default_params();
        let result = optimize(&model, &params, &mut rng).unwrap();

        assert_eq!(result.strategy, Strategy::HillClimbing);
        assert_eq!(result.report.optimized_revenue, result.best_value);
        assert!(
            (result.report.current_revenue - evaluate(&model, model.baseline())).abs() < 1e-6
        );
        assert_eq!(result.price_map(&model).len(), 2);
    }

    #[test]
    fn test_compare_strategies_runs_all() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(9);
        let params: Vec<StrategyParams> = Strategy::ALL.iter().map(|s| s.default_params()).collect();
        let results = compare_strategies(&model, &params, &mut rng).unwrap();

        let strategies: Vec<Strategy> = results.iter().map(|r| r.strategy).collect();
        assert_eq!(strategies, Strategy::ALL.to_vec());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let model = sample_model();
        let params = Strategy::SimulatedAnnealing.default_params();

        let first = optimize(&model, &params, &mut StdRng::seed_from_u64(77)).unwrap();
        let second = optimize(&model, &params, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(first.best_state, second.best_state);
        assert_eq!(first.best_value, second.best_value);
    }
}
