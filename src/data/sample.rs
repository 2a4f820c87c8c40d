use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{ItemId, MenuItem, SalesRecord};

/// Café catalog used for demos: (id, name, price, category, elasticity).
const SAMPLE_ITEMS: [(ItemId, &str, f64, u32, f64); 8] = [
    (1, "Black Coffee", 25000.0, 1, -1.2),
    (2, "Milk Coffee", 30000.0, 1, -1.3),
    (3, "Cappuccino", 45000.0, 1, -1.5),
    (4, "Latte", 50000.0, 1, -1.6),
    (5, "Peach Tea", 40000.0, 2, -1.4),
    (6, "Bubble Milk Tea", 45000.0, 2, -1.5),
    (7, "Bread Stick", 15000.0, 3, -1.8),
    (8, "Croissant", 25000.0, 3, -1.7),
];

pub fn sample_menu() -> Vec<MenuItem> {
    SAMPLE_ITEMS
        .iter()
        .map(|&(id, name, price, category, _)| MenuItem {
            id,
            name: name.to_string(),
            current_price: price,
            category_id: Some(category),
        })
        .collect()
}

/// Loyal black-coffee drinkers barely react to price; pastries with many
/// substitutes react the most.
pub fn sample_elasticity() -> HashMap<ItemId, f64> {
    SAMPLE_ITEMS
        .iter()
        .map(|&(id, _, _, _, elasticity)| (id, elasticity))
        .collect()
}

/// Random order history over `menu`: each order holds 1 to 4 distinct
/// items with quantities 1 to 3, dated within one 30-day month.
pub fn generate_sales(menu: &[MenuItem], orders: u32, rng: &mut impl Rng) -> Vec<SalesRecord> {
    let ids: Vec<ItemId> = menu.iter().map(|item| item.id).collect();
    let mut sales = Vec::new();
    if ids.is_empty() {
        return sales;
    }

    for order_id in 1..=orders {
        let basket_size = rng.gen_range(1..=4).min(ids.len());
        let day = rng.gen_range(1..=30);
        let date = format!("2023-06-{:02}", day);

        let basket: Vec<ItemId> = ids.choose_multiple(rng, basket_size).copied().collect();
        for item_id in basket {
            sales.push(SalesRecord {
                item_id,
                quantity: rng.gen_range(1..=3),
                order_id,
                date: date.clone(),
            });
        }
    }

    sales
}
