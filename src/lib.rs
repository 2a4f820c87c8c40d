pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod interface;
pub mod logging;
pub mod market;
pub mod models;
pub mod report;
pub mod search;

pub use error::{PricingError, Result};
pub use market::{evaluate, DomainModel, ModelOptions};
pub use models::{MenuItem, PriceAssignment, PriceBounds, SalesRecord};
pub use search::{optimize, Optimization, Strategy, StrategyParams};
