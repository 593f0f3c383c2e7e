use thiserror::Error;

use crate::character::Category;

pub type Result<T> = std::result::Result<T, AppError>;

// Enum for handling application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Serialization error: {0:#}")]
    Serialization(#[from] serde_json::Error), // Settings and rule tables are JSON.

    #[error("IO error: {0:#}")]
    IO(#[from] std::io::Error), // Input/output errors.

    #[error("Logger error: {0}")]
    Logger(String),

    #[error("Logger already set")]
    LoggerAlreadySet,

    #[error("Could not determine the home directory")]
    NoHomeDirectory,

    #[error("Invalid rule tables: {0}")]
    InvalidRules(String),
}

/// A rejected ledger operation. Rejections never leave partial state behind;
/// the `Display` text is what the progression screen shows the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Value unchanged: '{name}' is already {current}")]
    ValueUnchanged { name: String, current: u8 },

    #[error("Cannot lower '{name}' below its starting value ({base})")]
    BelowFloor { name: String, base: u8 },

    #[error("Cannot raise '{name}' above {} ({ceiling})", limit_label(.category))]
    AboveCeiling {
        name: String,
        category: Category,
        ceiling: u8,
    },

    #[error("Not enough points! Cost: {cost}, Available: {available}")]
    InsufficientPoints { cost: i32, available: i32 },

    #[error("Cannot delete traits of this category ({0})")]
    NotDeletable(Category),

    #[error("Cannot add new traits to this category ({0})")]
    NotExtensible(Category),

    #[error("Trait not found: '{0}'")]
    NotFound(String),

    #[error("'{0}' is already on the sheet")]
    AlreadyPresent(String),
}

fn limit_label(category: &Category) -> &'static str {
    if category.is_singleton() {
        "maximum"
    } else {
        "generation limit"
    }
}
