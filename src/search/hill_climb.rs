use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PricingError, Result};
use crate::market::{evaluate, random_neighbor, DomainModel};
use crate::search::SearchOutcome;

/// Hill climbing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillClimbingParams {
    pub max_iterations: usize,
    /// Maximum relative price move per step.
    pub step_size: f64,
    /// Stop after this many consecutive non-improving neighbors.
    pub plateau_iterations: usize,
}

impl Default for HillClimbingParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            step_size: 0.05,
            plateau_iterations: 100,
        }
    }
}

impl HillClimbingParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.step_size.is_finite() && self.step_size >= 0.0) {
            return Err(PricingError::InvalidParameter {
                name: "step_size",
                reason: format!("must be a non-negative number, got {}", self.step_size),
            });
        }
        Ok(())
    }
}

/// Greedy local search from the current prices.
///
/// Only strictly better neighbors are accepted, so the returned state is
/// also the best one seen.
pub fn hill_climb(
    model: &DomainModel,
    params: &HillClimbingParams,
    rng: &mut impl Rng,
) -> SearchOutcome {
    let mut current = model.baseline().clone();
    let mut current_value = evaluate(model, &current);
    let mut history = Vec::with_capacity(params.max_iterations.min(4096) + 1);
    history.push(current_value);

    info!(
        items = model.len(),
        max_iterations = params.max_iterations,
        baseline = current_value,
        "starting hill climbing"
    );

    let mut without_improvement = 0;
    let mut iterations = 0;

    for _ in 0..params.max_iterations {
        iterations += 1;
        let neighbor = random_neighbor(model, &current, params.step_size, rng);
        let neighbor_value = evaluate(model, &neighbor);

        if neighbor_value > current_value {
            debug!(iteration = iterations, revenue = neighbor_value, "improved");
            current = neighbor;
            current_value = neighbor_value;
            without_improvement = 0;
        } else {
            without_improvement += 1;
        }
        history.push(current_value);

        if without_improvement >= params.plateau_iterations {
            debug!(iteration = iterations, "plateau reached");
            break;
        }
    }

    info!(iterations, revenue = current_value, "hill climbing finished");

    SearchOutcome {
        best: current,
        best_value: current_value,
        iterations,
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::ModelOptions;
    use crate::models::{MenuItem, SalesRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_model() -> DomainModel {
        let menu = vec![
            MenuItem::new(1, "Black Coffee", 25000.0),
            MenuItem::new(2, "Peach Tea", 40000.0),
        ];
        let sales = vec![
            SalesRecord::new(1, 10, 1),
            SalesRecord::new(2, 4, 2),
            SalesRecord::new(1, 3, 3),
            SalesRecord::new(2, 1, 3),
        ];
        let mut elasticity = std::collections::HashMap::new();
        elasticity.insert(1, -0.5);
        elasticity.insert(2, -1.8);
        let options = ModelOptions {
            elasticity: Some(elasticity),
            ..ModelOptions::default()
        };
        DomainModel::new(menu, &sales, options).unwrap()
    }

    #[test]
    fn test_zero_iterations_returns_baseline() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(1);
        let params = HillClimbingParams {
            max_iterations: 0,
            ..HillClimbingParams::default()
        };

        let outcome = hill_climb(&model, &params, &mut rng);
        assert_eq!(outcome.best, *model.baseline());
        assert_eq!(outcome.best_value, evaluate(&model, model.baseline()));
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_never_worse_than_baseline() {
        let model = sample_model();
        let baseline = evaluate(&model, model.baseline());
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = hill_climb(&model, &HillClimbingParams::default(), &mut rng);
            assert!(outcome.best_value >= baseline);
            assert!(model.is_feasible(&outcome.best));
        }
    }

    #[test]
    fn test_history_is_monotonic() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = hill_climb(&model, &HillClimbingParams::default(), &mut rng);
        assert!(outcome.history.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(outcome.history.len(), outcome.iterations + 1);
    }

    #[test]
    fn test_plateau_stops_early() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(8);
        let params = HillClimbingParams {
            max_iterations: 10_000,
            step_size: 0.05,
            plateau_iterations: 5,
        };
        let outcome = hill_climb(&model, &params, &mut rng);
        assert!(outcome.iterations < 10_000);
    }

    #[test]
    fn test_validate_rejects_negative_step() {
        let params = HillClimbingParams {
            step_size: -0.1,
            ..HillClimbingParams::default()
        };
        assert!(params.validate().is_err());
        assert!(HillClimbingParams::default().validate().is_ok());
    }
}
