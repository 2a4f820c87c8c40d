use std::path::PathBuf;

use tracing::info;

use crate::data::{load_elasticity, load_menu, load_price_bounds, load_sales};
use crate::error::Result;
use crate::market::{DomainModel, ModelOptions};

/// Locations of the files a pricing run reads.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub menu: PathBuf,
    pub sales: PathBuf,
    pub elasticity: Option<PathBuf>,
    pub bounds: Option<PathBuf>,
}

/// Read every input file and build the domain model from them.
pub fn load_model(paths: &InputPaths, strict: bool) -> Result<DomainModel> {
    let menu = load_menu(&paths.menu)?;
    let sales = load_sales(&paths.sales)?;
    info!(
        items = menu.len(),
        records = sales.len(),
        "loaded menu and sales"
    );

    let elasticity = paths.elasticity.as_ref().map(load_elasticity).transpose()?;
    let price_bounds = paths.bounds.as_ref().map(load_price_bounds).transpose()?;

    DomainModel::new(
        menu,
        &sales,
        ModelOptions {
            price_bounds,
            elasticity,
            strict,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{save_elasticity, save_menu, save_sales};
    use crate::models::{MenuItem, SalesRecord};
    use std::collections::HashMap;

    #[test]
    fn test_load_model_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let menu_path = dir.path().join("menu.json");
        let sales_path = dir.path().join("sales.csv");
        let elasticity_path = dir.path().join("elasticity.json");

        save_menu(
            &menu_path,
            &[
                MenuItem::new(1, "Latte", 50000.0),
                MenuItem::new(2, "Croissant", 25000.0),
            ],
        )
        .unwrap();
        save_sales(
            &sales_path,
            &[SalesRecord::new(1, 2, 1), SalesRecord::new(2, 1, 1)],
        )
        .unwrap();
        let mut elasticity = HashMap::new();
        elasticity.insert(1, -1.6);
        save_elasticity(&elasticity_path, &elasticity).unwrap();

        let paths = InputPaths {
            menu: menu_path,
            sales: sales_path,
            elasticity: Some(elasticity_path),
            bounds: None,
        };
        let model = load_model(&paths, false).unwrap();

        assert_eq!(model.len(), 2);
        assert_eq!(model.sales_total_of(1), 2.0);
        assert_eq!(model.elasticity(0), -1.6);
        assert_eq!(model.cross_selling_of(1, 2), 1.0);
    }

    #[test]
    fn test_missing_menu_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = InputPaths {
            menu: dir.path().join("nope.json"),
            sales: dir.path().join("sales.csv"),
            elasticity: None,
            bounds: None,
        };
        assert!(matches!(
            load_model(&paths, false),
            Err(crate::error::PricingError::Io(_))
        ));
    }
}
