pub mod menu;
pub mod pricing;

pub use menu::{ItemId, MenuItem, OrderId, SalesRecord};
pub use pricing::{round_price, PriceAssignment, PriceBounds};
