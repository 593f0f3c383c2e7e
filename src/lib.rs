pub mod app;
pub mod character;
pub mod cleanup;
pub mod context;
pub mod error;
pub mod export;
pub mod logging;
pub mod rules;
pub mod settings;
pub mod tui;
pub mod ui;

// Re-export commonly used items for easier access
pub use character::{Budget, Category, Character, TraitChange, TraitRecord, TraitRemoval};
pub use error::{AppError, LedgerError};
pub use rules::{RuleTables, V20_RULES};
pub use settings::Settings;
