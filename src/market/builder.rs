use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::error::{PricingError, Result};
use crate::market::constants::DEFAULT_ELASTICITY;
use crate::models::{ItemId, MenuItem, OrderId, PriceAssignment, PriceBounds, SalesRecord};

/// Optional overrides accepted when building a [`DomainModel`].
#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    /// Per-item price bounds. Items without an entry use [`PriceBounds::around`].
    pub price_bounds: Option<HashMap<ItemId, PriceBounds>>,
    /// Per-item elasticity. Items without an entry use [`DEFAULT_ELASTICITY`].
    pub elasticity: Option<HashMap<ItemId, f64>>,
    /// Reject sales records that reference items missing from the menu.
    pub strict: bool,
}

/// Everything the revenue evaluator and the search strategies need, derived
/// once from the menu snapshot and the sales history.
///
/// All per-item data is stored in catalog order, so index `i` refers to the
/// same item in every vector and in every [`PriceAssignment`].
#[derive(Debug, Clone)]
pub struct DomainModel {
    items: Vec<MenuItem>,
    index: HashMap<ItemId, usize>,
    sales_totals: Vec<f64>,
    /// Row-major `n x n` affinity matrix; the diagonal is always 0.
    cross_selling: Vec<f64>,
    bounds: Vec<PriceBounds>,
    elasticity: Vec<f64>,
    baseline: PriceAssignment,
    order_count: usize,
}

impl DomainModel {
    pub fn new(menu: Vec<MenuItem>, sales: &[SalesRecord], options: ModelOptions) -> Result<Self> {
        let mut index = HashMap::with_capacity(menu.len());
        for (idx, item) in menu.iter().enumerate() {
            if !item.is_valid() {
                return Err(PricingError::InvalidInput(format!(
                    "menu item {} has invalid price {}",
                    item.id, item.current_price
                )));
            }
            if index.insert(item.id, idx).is_some() {
                return Err(PricingError::DuplicateMenuItem(item.id));
            }
        }

        if options.strict {
            validate_sales(&menu, sales)?;
        }

        let bounds = resolve_bounds(&menu, options.price_bounds.as_ref())?;
        let elasticity = menu
            .iter()
            .map(|item| {
                options
                    .elasticity
                    .as_ref()
                    .and_then(|table| table.get(&item.id).copied())
                    .unwrap_or(DEFAULT_ELASTICITY)
            })
            .collect();

        let sales_totals = aggregate_sales(&index, menu.len(), sales);
        let (cross_selling, order_count) = cross_selling_matrix(&index, menu.len(), sales);
        let baseline = PriceAssignment::new(menu.iter().map(|item| item.current_price).collect());

        debug!(
            items = menu.len(),
            records = sales.len(),
            orders = order_count,
            "built domain model"
        );

        Ok(Self {
            items: menu,
            index,
            sales_totals,
            cross_selling,
            bounds,
            elasticity,
            baseline,
            order_count,
        })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Historical quantity sold of the item at `idx`.
    #[inline]
    pub fn sales_total(&self, idx: usize) -> f64 {
        self.sales_totals[idx]
    }

    /// Fraction of orders containing both items at `a` and `b`.
    #[inline]
    pub fn cross_selling(&self, a: usize, b: usize) -> f64 {
        self.cross_selling[a * self.items.len() + b]
    }

    /// Affinity row of the item at `idx` against every item.
    #[inline]
    pub fn cross_selling_row(&self, idx: usize) -> &[f64] {
        let n = self.items.len();
        &self.cross_selling[idx * n..(idx + 1) * n]
    }

    #[inline]
    pub fn bounds(&self, idx: usize) -> PriceBounds {
        self.bounds[idx]
    }

    #[inline]
    pub fn elasticity(&self, idx: usize) -> f64 {
        self.elasticity[idx]
    }

    /// Current catalog prices. Never mutated by any search.
    pub fn baseline(&self) -> &PriceAssignment {
        &self.baseline
    }

    /// Distinct orders seen in the sales history.
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Quantity sold by item id (0 for unknown ids).
    pub fn sales_total_of(&self, id: ItemId) -> f64 {
        self.index_of(id).map(|i| self.sales_totals[i]).unwrap_or(0.0)
    }

    /// Cross-selling affinity by item id (0 for unknown ids or `a == b`).
    pub fn cross_selling_of(&self, a: ItemId, b: ItemId) -> f64 {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.cross_selling(i, j),
            _ => 0.0,
        }
    }

    /// Whether every price of `assignment` is on the grid and inside its bounds.
    pub fn is_feasible(&self, assignment: &PriceAssignment) -> bool {
        assignment.len() == self.len()
            && assignment
                .iter()
                .zip(&self.bounds)
                .all(|(price, bounds)| bounds.contains(price) && bounds.snap(price) == price)
    }

    /// Key an assignment by item id.
    pub fn to_price_map(&self, assignment: &PriceAssignment) -> BTreeMap<ItemId, f64> {
        self.items
            .iter()
            .zip(assignment.iter())
            .map(|(item, price)| (item.id, price))
            .collect()
    }

    /// Catalog copy carrying the prices of `assignment`.
    pub fn apply(&self, assignment: &PriceAssignment) -> Vec<MenuItem> {
        self.items
            .iter()
            .zip(assignment.iter())
            .map(|(item, price)| MenuItem {
                current_price: price,
                ..item.clone()
            })
            .collect()
    }
}

/// Reject sales records whose item is not on the menu.
pub fn validate_sales(menu: &[MenuItem], sales: &[SalesRecord]) -> Result<()> {
    let known: BTreeSet<ItemId> = menu.iter().map(|item| item.id).collect();
    match sales.iter().find(|record| !known.contains(&record.item_id)) {
        Some(orphan) => Err(PricingError::UnknownMenuItem {
            item_id: orphan.item_id,
            order_id: orphan.order_id,
        }),
        None => Ok(()),
    }
}

fn resolve_bounds(
    menu: &[MenuItem],
    supplied: Option<&HashMap<ItemId, PriceBounds>>,
) -> Result<Vec<PriceBounds>> {
    menu.iter()
        .map(|item| {
            let bounds = supplied
                .and_then(|table| table.get(&item.id).copied())
                .unwrap_or_else(|| PriceBounds::around(item.current_price));
            if bounds.is_valid() {
                Ok(bounds)
            } else {
                Err(PricingError::InvalidInput(format!(
                    "price bounds for item {} are not a non-negative ordered range: ({}, {})",
                    item.id, bounds.min, bounds.max
                )))
            }
        })
        .collect()
}

fn aggregate_sales(index: &HashMap<ItemId, usize>, len: usize, sales: &[SalesRecord]) -> Vec<f64> {
    let mut totals = vec![0.0; len];
    let mut orphans = 0usize;

    for record in sales {
        match index.get(&record.item_id) {
            Some(&idx) => totals[idx] += f64::from(record.quantity),
            None => orphans += 1,
        }
    }

    if orphans > 0 {
        warn!(orphans, "ignored sales records for items missing from the menu");
    }

    totals
}

/// Co-occurrence frequencies normalized by the number of distinct orders.
///
/// Orders containing only unknown items still count toward the denominator.
fn cross_selling_matrix(
    index: &HashMap<ItemId, usize>,
    len: usize,
    sales: &[SalesRecord],
) -> (Vec<f64>, usize) {
    let mut orders: HashMap<OrderId, BTreeSet<usize>> = HashMap::new();
    for record in sales {
        let basket = orders.entry(record.order_id).or_default();
        if let Some(&idx) = index.get(&record.item_id) {
            basket.insert(idx);
        }
    }

    let mut counts = vec![0u32; len * len];
    for basket in orders.values() {
        for &a in basket {
            for &b in basket {
                if a != b {
                    counts[a * len + b] += 1;
                }
            }
        }
    }

    let denominator = orders.len().max(1) as f64;
    let matrix = counts
        .into_iter()
        .map(|count| f64::from(count) / denominator)
        .collect();

    (matrix, orders.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> Vec<MenuItem> {
        vec![
            MenuItem::new(1, "Espresso", 25000.0),
            MenuItem::new(2, "Croissant", 25000.0),
            MenuItem::new(3, "Latte", 50000.0),
        ]
    }

    fn sample_sales() -> Vec<SalesRecord> {
        vec![
            SalesRecord::new(1, 2, 100),
            SalesRecord::new(2, 1, 100),
            SalesRecord::new(1, 1, 101),
            SalesRecord::new(3, 3, 102),
            SalesRecord::new(2, 2, 103),
            SalesRecord::new(1, 1, 103),
        ]
    }

    #[test]
    fn test_sales_totals() {
        let model = DomainModel::new(sample_menu(), &sample_sales(), ModelOptions::default()).unwrap();
        assert_eq!(model.sales_total_of(1), 4.0);
        assert_eq!(model.sales_total_of(2), 3.0);
        assert_eq!(model.sales_total_of(3), 3.0);
        assert_eq!(model.order_count(), 4);
    }

    #[test]
    fn test_cross_selling_counts_shared_orders() {
        let model = DomainModel::new(sample_menu(), &sample_sales(), ModelOptions::default()).unwrap();
        // Espresso and Croissant share orders 100 and 103 out of 4
        assert!((model.cross_selling_of(1, 2) - 0.5).abs() < 1e-12);
        assert!((model.cross_selling_of(2, 1) - 0.5).abs() < 1e-12);
        assert_eq!(model.cross_selling_of(1, 3), 0.0);
        assert_eq!(model.cross_selling_of(1, 1), 0.0);
    }

    #[test]
    fn test_empty_history_degenerates_to_zero() {
        let model = DomainModel::new(sample_menu(), &[], ModelOptions::default()).unwrap();
        assert_eq!(model.order_count(), 0);
        for i in 0..model.len() {
            assert_eq!(model.sales_total(i), 0.0);
            assert!(model.cross_selling_row(i).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_defaults_for_bounds_and_elasticity() {
        let mut elasticity = HashMap::new();
        elasticity.insert(3, -1.6);
        let mut bounds = HashMap::new();
        bounds.insert(2, PriceBounds::new(20000.0, 30000.0));

        let options = ModelOptions {
            price_bounds: Some(bounds),
            elasticity: Some(elasticity),
            strict: false,
        };
        let model = DomainModel::new(sample_menu(), &sample_sales(), options).unwrap();

        assert_eq!(model.elasticity(0), DEFAULT_ELASTICITY);
        assert_eq!(model.elasticity(2), -1.6);
        assert_eq!(model.bounds(1), PriceBounds::new(20000.0, 30000.0));
        assert_eq!(model.bounds(2), PriceBounds::around(50000.0));
    }

    #[test]
    fn test_orphan_records_ignored_unless_strict() {
        let mut sales = sample_sales();
        sales.push(SalesRecord::new(99, 5, 104));

        let lenient = DomainModel::new(sample_menu(), &sales, ModelOptions::default()).unwrap();
        assert_eq!(lenient.sales_total_of(99), 0.0);
        // The orphan's order still counts as a distinct order
        assert_eq!(lenient.order_count(), 5);

        let strict = ModelOptions {
            strict: true,
            ..ModelOptions::default()
        };
        let err = DomainModel::new(sample_menu(), &sales, strict).unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnknownMenuItem {
                item_id: 99,
                order_id: 104
            }
        ));
    }

    #[test]
    fn test_duplicate_menu_ids_rejected() {
        let mut menu = sample_menu();
        menu.push(MenuItem::new(2, "Another Croissant", 20000.0));
        let err = DomainModel::new(menu, &[], ModelOptions::default()).unwrap_err();
        assert!(matches!(err, PricingError::DuplicateMenuItem(2)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut bounds = HashMap::new();
        bounds.insert(1, PriceBounds::new(30000.0, 10000.0));
        let options = ModelOptions {
            price_bounds: Some(bounds),
            ..ModelOptions::default()
        };
        assert!(DomainModel::new(sample_menu(), &[], options).is_err());
    }

    #[test]
    fn test_negative_bounds_rejected() {
        let mut bounds = HashMap::new();
        bounds.insert(1, PriceBounds::new(-5000.0, 2000.0));
        let options = ModelOptions {
            price_bounds: Some(bounds),
            ..ModelOptions::default()
        };
        assert!(matches!(
            DomainModel::new(sample_menu(), &[], options),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_free_and_cheap_items_get_floor_bounds() {
        let menu = vec![
            MenuItem::new(1, "Coffee", 25000.0),
            MenuItem::new(2, "Free Water", 0.0),
            MenuItem::new(3, "Sugar Sachet", 500.0),
        ];
        let model = DomainModel::new(menu, &[], ModelOptions::default()).unwrap();
        assert_eq!(model.bounds(1), PriceBounds::new(1000.0, 1000.0));
        assert_eq!(model.bounds(2), PriceBounds::new(1000.0, 1000.0));
    }

    #[test]
    fn test_apply_and_price_map() {
        let model = DomainModel::new(sample_menu(), &[], ModelOptions::default()).unwrap();
        let proposal = PriceAssignment::new(vec![27000.0, 24000.0, 50000.0]);

        let map = model.to_price_map(&proposal);
        assert_eq!(map[&1], 27000.0);
        assert_eq!(map[&2], 24000.0);

        let updated = model.apply(&proposal);
        assert_eq!(updated[0].current_price, 27000.0);
        assert_eq!(updated[0].name, "Espresso");
        // The model's baseline is untouched
        assert_eq!(model.baseline().price(0), 25000.0);
    }

    #[test]
    fn test_is_feasible() {
        let model = DomainModel::new(sample_menu(), &[], ModelOptions::default()).unwrap();
        assert!(model.is_feasible(&PriceAssignment::new(vec![25000.0, 18000.0, 75000.0])));
        // Off-grid
        assert!(!model.is_feasible(&PriceAssignment::new(vec![25500.0, 25000.0, 50000.0])));
        // Above the max
        assert!(!model.is_feasible(&PriceAssignment::new(vec![40000.0, 25000.0, 50000.0])));
    }
}
