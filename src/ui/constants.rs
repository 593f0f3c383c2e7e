// ui/constants.rs

use ratatui::style::{Color, Modifier, Style};

pub const APP_TITLE: &str = "VTM NPC Progression Tool";
pub const BANNER: &str = "VAMPIRE: THE MASQUERADE - NPC PROGRESSION TOOL";

pub const SYM_HEADER_L: &str = "═══ ";
pub const SYM_HEADER_R: &str = " ═══";
pub const SYM_POINTER: &str = "► ";
pub const SYM_SELECTED_L: &str = "< ";
pub const SYM_SELECTED_R: &str = " >";

pub const CONTROLS_PROGRESSION: &str =
    "←→/0-9: Modify | ↑↓: Move | Tab/Space: Next Col | Enter: Add | x/Del: Remove | Ctrl+X: Done";

// Bone on black.
pub fn text() -> Style {
    Style::default().fg(Color::White)
}

// Blood red.
pub fn accent() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn border() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::DIM)
}

pub fn title() -> Style {
    accent().add_modifier(Modifier::UNDERLINED)
}

pub fn selected() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::REVERSED)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

// The active cursor row.
pub fn highlight() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}
