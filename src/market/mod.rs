pub mod builder;
pub mod constants;
pub mod evaluator;
pub mod neighbor;

pub use builder::{validate_sales, DomainModel, ModelOptions};
pub use constants::*;
pub use evaluator::{evaluate, predicted_quantity, quantity_ratio, revenue_breakdown, ItemRevenue};
pub use neighbor::{mutate_price, random_neighbor};
