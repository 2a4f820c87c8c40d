use rand::Rng;

use crate::market::builder::DomainModel;
use crate::market::constants::MUTATION_SPAN;
use crate::models::{PriceAssignment, PriceBounds};

/// Move one randomly chosen item's price by up to `±step_size` of its
/// current value, snapped to the price grid inside the item's bounds.
///
/// Every other price is copied unchanged. An empty assignment is returned
/// as-is.
pub fn random_neighbor(
    model: &DomainModel,
    assignment: &PriceAssignment,
    step_size: f64,
    rng: &mut impl Rng,
) -> PriceAssignment {
    let mut neighbor = assignment.clone();
    if neighbor.is_empty() {
        return neighbor;
    }

    let idx = rng.gen_range(0..neighbor.len());
    let current = neighbor.price(idx);
    let span = current.abs() * step_size;
    let change = if span > 0.0 {
        rng.gen_range(-span..=span)
    } else {
        0.0
    };

    neighbor.set_price(idx, model.bounds(idx).snap(current + change));
    neighbor
}

/// Single-gene mutation used by the genetic algorithm: a uniform ±10%
/// relative change, snapped to the grid inside `bounds`.
pub fn mutate_price(price: f64, bounds: PriceBounds, rng: &mut impl Rng) -> f64 {
    let ratio = rng.gen_range(-MUTATION_SPAN..=MUTATION_SPAN);
    bounds.snap(price * (1.0 + ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::builder::ModelOptions;
    use crate::models::MenuItem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_model() -> DomainModel {
        let menu = vec![
            MenuItem::new(1, "Black Coffee", 25000.0),
            MenuItem::new(2, "Milk Coffee", 30000.0),
            MenuItem::new(3, "Bread Stick", 15000.0),
        ];
        DomainModel::new(menu, &[], ModelOptions::default()).unwrap()
    }

    #[test]
    fn test_neighbor_changes_at_most_one_price() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(11);
        let base = model.baseline().clone();

        for _ in 0..100 {
            let neighbor = random_neighbor(&model, &base, 0.2, &mut rng);
            let changed = base
                .iter()
                .zip(neighbor.iter())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed <= 1);
        }
    }

    #[test]
    fn test_neighbor_respects_bounds_and_grid() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = model.baseline().clone();

        // A random walk with a large step keeps hitting the bounds
        for _ in 0..500 {
            state = random_neighbor(&model, &state, 0.5, &mut rng);
            assert!(model.is_feasible(&state));
        }
    }

    #[test]
    fn test_zero_step_rounds_only() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(5);
        let neighbor = random_neighbor(&model, model.baseline(), 0.0, &mut rng);
        assert_eq!(neighbor, *model.baseline());
    }

    #[test]
    fn test_empty_assignment_is_returned_unchanged() {
        let model = DomainModel::new(vec![], &[], ModelOptions::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let neighbor = random_neighbor(&model, model.baseline(), 0.05, &mut rng);
        assert!(neighbor.is_empty());
    }

    #[test]
    fn test_negative_price_neighbor_does_not_panic() {
        let model = sample_model();
        let mut rng = StdRng::seed_from_u64(13);
        let state = PriceAssignment::new(vec![-1000.0, -30000.0, -15000.0]);

        for _ in 0..100 {
            let neighbor = random_neighbor(&model, &state, 3.0, &mut rng);
            assert_eq!(neighbor.len(), 3);
        }
    }

    #[test]
    fn test_mutate_price_within_ten_percent() {
        let bounds = PriceBounds::around(40000.0);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let mutated = mutate_price(40000.0, bounds, &mut rng);
            assert!((36000.0..=44000.0).contains(&mutated));
            assert_eq!(mutated % 1000.0, 0.0);
        }
    }
}
