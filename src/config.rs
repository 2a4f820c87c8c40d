use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::search::StrategyParams;

/// Load strategy parameters from a JSON file tagged by `"strategy"`.
///
/// Fields left out of the file take their defaults. The parameters are
/// validated before they are returned.
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<StrategyParams> {
    let content = fs::read_to_string(path)?;
    let params: StrategyParams = serde_json::from_str(&content)?;
    params.validate()?;
    Ok(params)
}

/// Save strategy parameters as pretty JSON.
pub fn save_params<P: AsRef<Path>>(path: P, params: &StrategyParams) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(params)?)?;
    Ok(())
}
