pub mod comparison;
pub mod output;

pub use comparison::{ComparisonReport, PriceChange};
pub use output::{write_comparison_csv, write_price_changes_csv, write_report_json, ComparisonRow};
