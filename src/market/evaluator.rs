use crate::market::builder::DomainModel;
use crate::market::constants::{QUANTITY_RATIO_MAX, QUANTITY_RATIO_MIN};
use crate::models::PriceAssignment;

/// Demand multiplier for one item at `new_price`.
///
/// Linear point-elasticity approximation, clamped to
/// `[QUANTITY_RATIO_MIN, QUANTITY_RATIO_MAX]` so that prices far from the
/// observed one cannot extrapolate to implausible demand.
#[inline]
pub fn quantity_ratio(elasticity: f64, original_price: f64, new_price: f64) -> f64 {
    let price_ratio = if original_price > 0.0 {
        new_price / original_price
    } else {
        1.0
    };
    (1.0 + elasticity * (price_ratio - 1.0)).clamp(QUANTITY_RATIO_MIN, QUANTITY_RATIO_MAX)
}

/// Predicted quantity sold for the item at `idx` when priced at `new_price`.
pub fn predicted_quantity(model: &DomainModel, idx: usize, new_price: f64) -> f64 {
    let original = model.sales_total(idx);
    original * quantity_ratio(model.elasticity(idx), model.baseline().price(idx), new_price)
}

/// Revenue contributions of one item under an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemRevenue {
    /// `new_price * new_quantity` of the item itself.
    pub direct: f64,
    /// Revenue dragged along on co-purchased items by the item's demand change.
    pub spillover: f64,
}

impl ItemRevenue {
    pub fn total(&self) -> f64 {
        self.direct + self.spillover
    }
}

/// Per-item revenue breakdown, in catalog order.
pub fn revenue_breakdown(model: &DomainModel, assignment: &PriceAssignment) -> Vec<ItemRevenue> {
    debug_assert_eq!(assignment.len(), model.len());

    (0..model.len())
        .map(|idx| item_revenue(model, assignment, idx))
        .collect()
}

/// Modeled total revenue of an assignment. Pure and `O(items²)`.
pub fn evaluate(model: &DomainModel, assignment: &PriceAssignment) -> f64 {
    debug_assert_eq!(assignment.len(), model.len());

    (0..model.len())
        .map(|idx| item_revenue(model, assignment, idx).total())
        .sum()
}

fn item_revenue(model: &DomainModel, assignment: &PriceAssignment, idx: usize) -> ItemRevenue {
    let original_quantity = model.sales_total(idx);
    if original_quantity == 0.0 {
        return ItemRevenue::default();
    }

    let new_price = assignment.price(idx);
    let new_quantity = predicted_quantity(model, idx, new_price);
    let direct = new_price * new_quantity;

    let quantity_change = new_quantity - original_quantity;
    if quantity_change == 0.0 {
        return ItemRevenue {
            direct,
            spillover: 0.0,
        };
    }

    // Diagonal of the affinity matrix is 0, so `other == idx` adds nothing
    let spillover = model
        .cross_selling_row(idx)
        .iter()
        .zip(assignment.iter())
        .map(|(affinity, other_price)| quantity_change * affinity * other_price)
        .sum();

    ItemRevenue { direct, spillover }
}
