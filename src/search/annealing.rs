use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PricingError, Result};
use crate::market::{evaluate, random_neighbor, DomainModel};
use crate::search::SearchOutcome;

/// Simulated annealing configuration with geometric cooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingParams {
    pub initial_temp: f64,
    /// Temperature multiplier applied after every iteration, in `(0, 1)`.
    pub cooling_rate: f64,
    /// The search stops once the temperature drops below this.
    pub min_temp: f64,
    pub max_iterations: usize,
    pub step_size: f64,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            initial_temp: 1.0,
            cooling_rate: 0.995,
            min_temp: 0.01,
            max_iterations: 10_000,
            step_size: 0.05,
        }
    }
}

impl AnnealingParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(PricingError::InvalidParameter {
                name: "cooling_rate",
                reason: format!("must be in (0, 1), got {}", self.cooling_rate),
            });
        }
        if !(self.min_temp > 0.0 && self.min_temp.is_finite()) {
            return Err(PricingError::InvalidParameter {
                name: "min_temp",
                reason: format!("must be positive, got {}", self.min_temp),
            });
        }
        if !(self.initial_temp.is_finite() && self.initial_temp > 0.0) {
            return Err(PricingError::InvalidParameter {
                name: "initial_temp",
                reason: format!("must be positive, got {}", self.initial_temp),
            });
        }
        if !(self.step_size.is_finite() && self.step_size >= 0.0) {
            return Err(PricingError::InvalidParameter {
                name: "step_size",
                reason: format!("must be a non-negative number, got {}", self.step_size),
            });
        }
        Ok(())
    }
}

/// Metropolis criterion for a maximization problem.
///
/// Improvements are always accepted. A worsening move of `delta < 0` is
/// accepted with probability `exp(delta / temperature)`; the exponential
/// underflows to 0 for large losses, which simply rejects the move.
pub fn accept_move(delta: f64, temperature: f64, rng: &mut impl Rng) -> bool {
    if delta > 0.0 {
        return true;
    }
    let probability = (delta / temperature).exp();
    rng.gen_range(0.0..1.0) < probability
}

/// Temperature-driven local search that may accept worse states to escape
/// local optima. Returns the best state ever visited, not the final one.
pub fn simulated_annealing(
    model: &DomainModel,
    params: &AnnealingParams,
    rng: &mut impl Rng,
) -> SearchOutcome {
    let mut current = model.baseline().clone();
    let mut current_value = evaluate(model, &current);
    let mut best = current.clone();
    let mut best_value = current_value;

    let mut history = Vec::with_capacity(params.max_iterations.min(16_384) + 1);
    history.push(best_value);

    info!(
        items = model.len(),
        max_iterations = params.max_iterations,
        initial_temp = params.initial_temp,
        baseline = current_value,
        "starting simulated annealing"
    );

    let mut temperature = params.initial_temp;
    let mut iterations = 0;
    let mut accepted = 0usize;

    for _ in 0..params.max_iterations {
        if temperature < params.min_temp {
            debug!(iteration = iterations, temperature, "frozen");
            break;
        }
        iterations += 1;

        let neighbor = random_neighbor(model, &current, params.step_size, rng);
        let neighbor_value = evaluate(model, &neighbor);
        let delta = neighbor_value - current_value;

        if accept_move(delta, temperature, rng) {
            current = neighbor;
            current_value = neighbor_value;
            accepted += 1;

            if current_value > best_value {
                debug!(iteration = iterations, revenue = current_value, temperature, "new best");
                best = current.clone();
                best_value = current_value;
            }
        }
        history.push(best_value);

        temperature *= params.cooling_rate;
    }

    info!(
        iterations,
        accepted,
        final_temp = temperature,
        revenue = best_value,
        "simulated annealing finished"
    );

    SearchOutcome {
        best,
        best_value,
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
            MenuItem::new(1, "Cappuccino", 45000.0),
            MenuItem::new(2, "Croissant", 25000.0),
            MenuItem::new(3, "Bread Stick", 15000.0),
        ];
        let sales = vec![
            SalesRecord::new(1, 2, 1),
            SalesRecord::new(2, 1, 1),
            SalesRecord::new(3, 3, 2),
            SalesRecord::new(1, 1, 3),
            SalesRecord::new(3, 1, 3),
        ];
        DomainModel::new(menu, &sales, ModelOptions::default()).unwrap()
    }

    #[test]
    fn test_accept_move_always_takes_improvements() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert!(accept_move(1.0, 1e-9, &mut rng));
        }
    }

    #[test]
    fn test_accept_move_rejects_huge_losses() {
        let mut rng = StdRng::seed_from_u64(0);
        // exp(-1e9) underflows to 0
        for _ in 0..100 {
            assert!(!accept_move(-1e9, 1.0, &mut rng));
        }
    }

    #[test]
    fn test_best_is_monotonic() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(17);
        let outcome = simulated_annealing(&model, &AnnealingParams::default(), &mut rng);

        assert!(outcome.history.windows(2).all(|w| w[1] >= w[0]));
        assert!(outcome.best_value >= evaluate(&model, model.baseline()));
        assert!(model.is_feasible(&outcome.best));
        assert!((evaluate(&model, &outcome.best) - outcome.best_value).abs() < 1e-6);
    }

    #[test]
    fn test_stops_when_frozen() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(3);
        let params = AnnealingParams {
            initial_temp: 1.0,
            cooling_rate: 0.5,
            min_temp: 0.1,
            max_iterations: 10_000,
            step_size: 0.05,
        };
        let outcome = simulated_annealing(&model, &params, &mut rng);
        // 1.0, 0.5, 0.25, 0.125 are all >= 0.1; 0.0625 is not
        assert_eq!(outcome.iterations, 4);
    }

    #[test]
    fn test_validate() {
        assert!(AnnealingParams::default().validate().is_ok());

        let bad_cooling = AnnealingParams {
            cooling_rate: 1.0,
            ..AnnealingParams::default()
        };
        assert!(bad_cooling.validate().is_err());

        let bad_min = AnnealingParams {
            min_temp: 0.0,
            ..AnnealingParams::default()
        };
        assert!(bad_min.validate().is_err());
    }
}
