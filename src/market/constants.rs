/// Smallest price granularity; every proposed price is a multiple of this.
pub const PRICE_STEP: f64 = 1000.0;

/// Default lower bound as a fraction of the current price.
pub const MIN_PRICE_FACTOR: f64 = 0.7;

/// Default upper bound as a fraction of the current price.
pub const MAX_PRICE_FACTOR: f64 = 1.5;

/// Absolute floor of the default lower bound.
pub const MIN_PRICE_FLOOR: f64 = 1000.0;

/// Price elasticity used for items without an explicit entry.
pub const DEFAULT_ELASTICITY: f64 = -1.3;

/// Quantity ratio range accepted from the linear demand approximation.
pub const QUANTITY_RATIO_MIN: f64 = 0.5;
pub const QUANTITY_RATIO_MAX: f64 = 1.5;

/// Individuals sampled per tournament in the genetic algorithm.
pub const TOURNAMENT_SIZE: usize = 3;

/// Relative span of a single gene mutation (±10%).
pub const MUTATION_SPAN: f64 = 0.1;
