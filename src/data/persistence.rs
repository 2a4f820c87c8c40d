use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{PricingError, Result};
use crate::models::{ItemId, MenuItem, PriceBounds, SalesRecord};

/// Load the menu catalog from a JSON array.
pub fn load_menu<P: AsRef<Path>>(path: P) -> Result<Vec<MenuItem>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save a menu catalog as a JSON array.
pub fn save_menu<P: AsRef<Path>>(path: P, menu: &[MenuItem]) -> Result<()> {
    let json = serde_json::to_string_pretty(menu)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load sales history from CSV, or from a JSON array when the file ends in
/// `.json`.
pub fn load_sales<P: AsRef<Path>>(path: P) -> Result<Vec<SalesRecord>> {
    let path = path.as_ref();
    if has_extension(path, "json") {
        let content = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Save sales history as CSV.
pub fn save_sales<P: AsRef<Path>>(path: P, sales: &[SalesRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in sales {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Load elasticities from a JSON object keyed by item id.
pub fn load_elasticity<P: AsRef<Path>>(path: P) -> Result<HashMap<ItemId, f64>> {
    let content = fs::read_to_string(path)?;
    let table: HashMap<ItemId, f64> = serde_json::from_str(&content)?;

    if let Some((id, value)) = table.iter().find(|(_, e)| !e.is_finite()) {
        return Err(PricingError::InvalidInput(format!(
            "elasticity for item {} is not a number: {}",
            id, value
        )));
    }

    Ok(table)
}

/// Save elasticities as a JSON object keyed by item id.
pub fn save_elasticity<P: AsRef<Path>>(path: P, table: &HashMap<ItemId, f64>) -> Result<()> {
    let sorted: std::collections::BTreeMap<_, _> = table.iter().collect();
    fs::write(path, serde_json::to_string_pretty(&sorted)?)?;
    Ok(())
}

/// Load price bounds from a JSON object of `"id": [min, max]` pairs.
pub fn load_price_bounds<P: AsRef<Path>>(path: P) -> Result<HashMap<ItemId, PriceBounds>> {
    let content = fs::read_to_string(path)?;
    let raw: HashMap<ItemId, (f64, f64)> = serde_json::from_str(&content)?;
    Ok(raw
        .into_iter()
        .map(|(id, (min, max))| (id, PriceBounds::new(min, max)))
        .collect())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
