// ui/mod.rs

mod component;
pub mod constants;
pub mod final_sheet;
pub mod greeting;
pub mod progression;
pub mod prompt;
pub mod setup;
pub mod utils;

pub use component::Component;

pub const MIN_WIDTH: u16 = 90;
pub const MIN_HEIGHT: u16 = 30;
