use serde::{Deserialize, Serialize};

/// Identifier of a menu item in the catalog.
pub type ItemId = u32;

/// Identifier of a customer order in the sales history.
pub type OrderId = u32;

/// A menu catalog entry.
///
/// The price is the one currently charged; it is the baseline every
/// optimization run compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,

    pub name: String,

    #[serde(rename = "price")]
    pub current_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
}

impl MenuItem {
    pub fn new(id: ItemId, name: impl Into<String>, current_price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            current_price,
            category_id: None,
        }
    }

    /// Basic validation: finite, non-negative price.
    pub fn is_valid(&self) -> bool {
        self.current_price.is_finite() && self.current_price >= 0.0
    }
}

/// One line item of a historical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "menu_item_id")]
    pub item_id: ItemId,

    pub quantity: u32,

    pub order_id: OrderId,

    #[serde(default)]
    pub date: String,
}

impl SalesRecord {
    pub fn new(item_id: ItemId, quantity: u32, order_id: OrderId) -> Self {
        Self {
            item_id,
            quantity,
            order_id,
            date: String::new(),
        }
    }
}
