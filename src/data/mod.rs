mod loader;
mod persistence;
mod sample;

pub use loader::{load_model, InputPaths};
pub use persistence::{
    load_elasticity, load_menu, load_price_bounds, load_sales, save_elasticity, save_menu,
    save_sales,
};
pub use sample::{generate_sales, sample_elasticity, sample_menu};
