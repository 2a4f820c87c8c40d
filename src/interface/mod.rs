pub mod prompts;
pub mod render;

pub use prompts::{prompt_select_changes, prompt_yes_no};
pub use render::{display_comparison_table, display_fitness_trace, display_price_changes, display_report};
