use dialoguer::{Confirm, MultiSelect};

use crate::error::Result;
use crate::models::ItemId;
use crate::report::PriceChange;

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Let the user pick which proposed price changes to keep.
///
/// All changes start selected. Returns the ids of the kept items.
pub fn prompt_select_changes(changes: &[PriceChange]) -> Result<Vec<ItemId>> {
    if changes.is_empty() {
        return Ok(Vec::new());
    }

    let labels: Vec<String> = changes
        .iter()
        .map(|c| {
            format!(
                "{}: {:.0} -> {:.0} ({:+.1}%)",
                c.name, c.old_price, c.new_price, c.change_percentage
            )
        })
        .collect();
    let defaults = vec![true; labels.len()];

    let selected = MultiSelect::new()
        .with_prompt("Select the price changes to apply (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    Ok(selected.into_iter().map(|i| changes[i].item_id).collect())
}
