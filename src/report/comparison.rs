use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::market::{evaluate, DomainModel};
use crate::models::ItemId;
use crate::search::{SearchOutcome, Strategy};

/// One item whose proposed price differs from the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub item_id: ItemId,
    pub name: String,
    pub old_price: f64,
    pub new_price: f64,
    pub change: f64,
    /// Relative change in percent; 0 when the old price is 0.
    pub change_percentage: f64,
}

/// Search result compared against the current prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub strategy: Strategy,
    pub current_revenue: f64,
    pub optimized_revenue: f64,
    pub improvement: f64,
    pub improvement_percentage: f64,
    pub execution_time_secs: f64,
    /// Iterations or generations completed.
    pub iterations: usize,
    /// Generations run, genetic algorithm only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generations: Option<usize>,
    /// Best fitness per generation, genetic algorithm only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_history: Option<Vec<f64>>,
    /// Sorted by descending absolute `change_percentage`.
    pub price_changes: Vec<PriceChange>,
}

impl ComparisonReport {
    pub fn new(
        model: &DomainModel,
        strategy: Strategy,
        outcome: &SearchOutcome,
        elapsed: Duration,
    ) -> Self {
        let current_revenue = evaluate(model, model.baseline());
        let improvement = outcome.best_value - current_revenue;
        let improvement_percentage = if current_revenue > 0.0 {
            improvement / current_revenue * 100.0
        } else {
            0.0
        };

        let mut price_changes: Vec<PriceChange> = model
            .items()
            .iter()
            .zip(outcome.best.iter())
            .filter(|(item, new_price)| item.current_price != *new_price)
            .map(|(item, new_price)| {
                let change = new_price - item.current_price;
                PriceChange {
                    item_id: item.id,
                    name: item.name.clone(),
                    old_price: item.current_price,
                    new_price,
                    change,
                    change_percentage: if item.current_price != 0.0 {
                        change / item.current_price * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        // Stable, so equal magnitudes keep catalog order
        price_changes.sort_by(|a, b| {
            b.change_percentage
                .abs()
                .total_cmp(&a.change_percentage.abs())
        });

        let genetic = strategy == Strategy::GeneticAlgorithm;

        Self {
            strategy,
            current_revenue,
            optimized_revenue: outcome.best_value,
            improvement,
            improvement_percentage,
            execution_time_secs: elapsed.as_secs_f64(),
            iterations: outcome.iterations,
            generations: genetic.then_some(outcome.iterations),
            fitness_history: genetic.then(|| outcome.history.clone()),
            price_changes,
        }
    }

    pub fn increases(&self) -> usize {
        self.price_changes.iter().filter(|c| c.change > 0.0).count()
    }

    pub fn decreases(&self) -> usize {
        self.price_changes.iter().filter(|c| c.change < 0.0).count()
    }
}
