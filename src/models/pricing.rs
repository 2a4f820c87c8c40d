use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::market::constants::{MAX_PRICE_FACTOR, MIN_PRICE_FACTOR, MIN_PRICE_FLOOR, PRICE_STEP};

/// Round a price to the nearest multiple of [`PRICE_STEP`].
#[inline]
pub fn round_price(price: f64) -> f64 {
    (price / PRICE_STEP).round() * PRICE_STEP
}

/// Inclusive price range allowed for one menu item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds derived from the current price: at most 30% cheaper (never
    /// below the price floor) and at most 50% more expensive.
    ///
    /// Items priced so low that the floor exceeds `1.5 * price` get the
    /// single-point range at the floor.
    pub fn around(current_price: f64) -> Self {
        let min = (current_price * MIN_PRICE_FACTOR).max(MIN_PRICE_FLOOR);
        Self {
            min,
            max: (current_price * MAX_PRICE_FACTOR).max(min),
        }
    }

    /// Finite, non-negative and ordered.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }

    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    /// Round `price` to the price grid and clamp it into the range.
    ///
    /// Clamping happens against the grid points inside `[min, max]` so the
    /// result stays a multiple of [`PRICE_STEP`]. A range too narrow to hold
    /// any grid point falls back to clamping against the raw bounds.
    pub fn snap(&self, price: f64) -> f64 {
        let rounded = round_price(price);
        let lo = (self.min / PRICE_STEP).ceil() * PRICE_STEP;
        let hi = (self.max / PRICE_STEP).floor() * PRICE_STEP;
        if lo <= hi {
            rounded.clamp(lo, hi)
        } else {
            rounded.clamp(self.min, self.max)
        }
    }

    /// Uniformly random price inside the range, snapped to the grid.
    pub fn random_price(&self, rng: &mut impl Rng) -> f64 {
        self.snap(rng.gen_range(self.min..=self.max))
    }
}

/// A complete candidate price for every menu item.
///
/// Prices are stored in catalog order; position `i` prices the `i`-th item
/// of the [`DomainModel`](crate::market::DomainModel) that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAssignment {
    prices: Vec<f64>,
}

impl PriceAssignment {
    pub fn new(prices: Vec<f64>) -> Self {
        Self { prices }
    }

    #[inline]
    pub fn price(&self, idx: usize) -> f64 {
        self.prices[idx]
    }

    #[inline]
    pub fn set_price(&mut self, idx: usize, price: f64) {
        self.prices[idx] = price;
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
