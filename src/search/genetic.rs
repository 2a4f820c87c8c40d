use std::time::{Duration, Instant};

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PricingError, Result};
use crate::market::{evaluate, mutate_price, DomainModel, TOURNAMENT_SIZE};
use crate::models::PriceAssignment;
use crate::search::SearchOutcome;

/// Genetic algorithm configuration.
///
/// The first four fields shape the population; the rest bound the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    pub population_size: usize,
    /// Fittest individuals copied unchanged into each new generation.
    pub elite_size: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Probability that a parent pair is recombined instead of copied.
    pub crossover_rate: f64,
    pub max_generations: usize,
    /// Generations without a new best fitness before stopping.
    pub convergence_threshold: usize,
    /// Wall-clock budget in seconds, checked between generations.
    pub time_limit_secs: Option<f64>,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            elite_size: 5,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            max_generations: 100,
            convergence_threshold: 20,
            time_limit_secs: None,
        }
    }
}

impl GeneticParams {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(PricingError::InvalidParameter {
                name: "population_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.elite_size > self.population_size {
            return Err(PricingError::InvalidParameter {
                name: "elite_size",
                reason: format!(
                    "{} exceeds population size {}",
                    self.elite_size, self.population_size
                ),
            });
        }
        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(PricingError::InvalidParameter {
                    name,
                    reason: format!("must be in [0, 1], got {}", rate),
                });
            }
        }
        if let Some(limit) = self.time_limit_secs {
            if !(limit.is_finite() && limit >= 0.0) {
                return Err(PricingError::InvalidParameter {
                    name: "time_limit_secs",
                    reason: format!("must be a non-negative number of seconds, got {}", limit),
                });
            }
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs_f64)
    }
}

#[derive(Debug, Clone)]
struct Individual {
    genes: PriceAssignment,
    fitness: f64,
}

impl Individual {
    fn evaluated(model: &DomainModel, genes: PriceAssignment) -> Self {
        let fitness = evaluate(model, &genes);
        Self { genes, fitness }
    }
}

/// Population-based search over price assignments.
///
/// Generation 0 always contains the current prices, and elitism keeps the
/// fittest individuals alive, so the result is never worse than the
/// baseline. `history` holds the best-ever fitness after generation 0 and
/// after every completed generation; `iterations` counts completed
/// generations.
pub fn genetic_algorithm(
    model: &DomainModel,
    params: &GeneticParams,
    rng: &mut impl Rng,
) -> SearchOutcome {
    let started = Instant::now();
    let time_limit = params.time_limit();

    let mut population = initial_population(model, params.population_size, rng);
    let mut best = fittest(&population).clone();
    let mut history = vec![best.fitness];

    info!(
        items = model.len(),
        population = params.population_size,
        max_generations = params.max_generations,
        initial_best = best.fitness,
        "starting genetic algorithm"
    );

    let mut generations = 0;
    let mut stale = 0;

    for _ in 0..params.max_generations {
        if let Some(limit) = time_limit {
            if started.elapsed() > limit {
                warn!(generations, ?limit, "time limit reached");
                break;
            }
        }

        population = next_generation(model, &population, params, rng);
        generations += 1;

        let leader = fittest(&population);
        if leader.fitness > best.fitness {
            debug!(generation = generations, fitness = leader.fitness, "new best");
            best = leader.clone();
            stale = 0;
        } else {
            stale += 1;
        }
        history.push(best.fitness);

        if stale >= params.convergence_threshold {
            debug!(generation = generations, stale, "converged");
            break;
        }
    }

    info!(
        generations,
        revenue = best.fitness,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "genetic algorithm finished"
    );

    SearchOutcome {
        best: best.genes,
        best_value: best.fitness,
        iterations: generations,
        history,
    }
}

/// Baseline first, then uniformly random prices within each item's bounds.
fn initial_population(model: &DomainModel, size: usize, rng: &mut impl Rng) -> Vec<Individual> {
    let mut population = Vec::with_capacity(size);
    population.push(Individual::evaluated(model, model.baseline().clone()));

    while population.len() < size {
        let genes = (0..model.len())
            .map(|idx| model.bounds(idx).random_price(rng))
            .collect();
        population.push(Individual::evaluated(model, PriceAssignment::new(genes)));
    }

    population
}

fn next_generation(
    model: &DomainModel,
    population: &[Individual],
    params: &GeneticParams,
    rng: &mut impl Rng,
) -> Vec<Individual> {
    let size = params.population_size;
    let mut ranked: Vec<usize> = (0..population.len()).collect();
    ranked.sort_by(|&a, &b| population[b].fitness.total_cmp(&population[a].fitness));

    let mut next: Vec<Individual> = ranked
        .iter()
        .take(params.elite_size.min(size))
        .map(|&i| population[i].clone())
        .collect();

    let remaining = size - next.len();
    if remaining == 0 {
        return next;
    }

    let parents: Vec<&Individual> = (0..remaining)
        .map(|_| tournament_select(population, rng))
        .collect();

    let mut pair = 0;
    while next.len() < size {
        let first = parents[pair % parents.len()];
        let second = parents[(pair + 1) % parents.len()];
        pair += 2;

        let (a, b) = crossover(&first.genes, &second.genes, params.crossover_rate, rng);
        for child in [a, b] {
            if next.len() < size {
                let child = mutate(model, child, params.mutation_rate, rng);
                next.push(Individual::evaluated(model, child));
            }
        }
    }

    next
}

/// Fittest of `TOURNAMENT_SIZE` distinct individuals sampled uniformly.
fn tournament_select<'a>(population: &'a [Individual], rng: &mut impl Rng) -> &'a Individual {
    let amount = TOURNAMENT_SIZE.min(population.len());
    index::sample(rng, population.len(), amount)
        .into_iter()
        .map(|i| &population[i])
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .unwrap_or(&population[0])
}

/// Single-point crossover over catalog order.
///
/// Genes before the cut come from the first parent and the rest from the
/// second; the sibling gets the opposite halves.
fn crossover(
    first: &PriceAssignment,
    second: &PriceAssignment,
    crossover_rate: f64,
    rng: &mut impl Rng,
) -> (PriceAssignment, PriceAssignment) {
    let len = first.len();
    if len < 2 || !rng.gen_bool(crossover_rate) {
        return (first.clone(), second.clone());
    }

    let cut = rng.gen_range(1..len);
    let (head_a, tail_a) = first.prices().split_at(cut);
    let (head_b, tail_b) = second.prices().split_at(cut);

    (
        PriceAssignment::new([head_a, tail_b].concat()),
        PriceAssignment::new([head_b, tail_a].concat()),
    )
}

fn mutate(
    model: &DomainModel,
    mut genes: PriceAssignment,
    mutation_rate: f64,
    rng: &mut impl Rng,
) -> PriceAssignment {
    for idx in 0..genes.len() {
        if rng.gen_bool(mutation_rate) {
            let mutated = mutate_price(genes.price(idx), model.bounds(idx), rng);
            genes.set_price(idx, mutated);
        }
    }
    genes
}

fn fittest(population: &[Individual]) -> &Individual {
    population
        .iter()
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .unwrap_or(&population[0])
}
