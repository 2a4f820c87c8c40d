use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Sales record in order {order_id} references unknown menu item {item_id}")]
    UnknownMenuItem { item_id: u32, order_id: u32 },

    #[error("Duplicate menu item id: {0}")]
    DuplicateMenuItem(u32),

    #[error("Unknown strategy '{name}'{}", did_you_mean(.suggestion))]
    UnknownStrategy {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
