// ui/greeting.rs
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::Line,
    widgets::{Paragraph, Widget},
};

use super::{
    Component, constants,
    setup::Setup,
    utils::{center_rect, framed_block, wrapped_lines},
};
use crate::{app::Action, context::Context};

const MODES: [(&str, &str); 2] = [
    (
        "Default Mode",
        "Standard character progression. Freebie Points are calculated based on the character's age, limiting improvements.",
    ),
    (
        "Free Mode",
        "Build any character you can imagine. Freebie Points are unlimited, allowing for unrestricted character improvement.",
    ),
];

/// Mode selection: capped freebie budget or free mode.
#[derive(Debug)]
pub struct Greeting {
    selected: usize,
}

impl Greeting {
    pub fn new(free_mode_default: bool) -> Self {
        Self {
            selected: usize::from(free_mode_default),
        }
    }

    pub fn free_mode(&self) -> bool {
        self.selected == 1
    }
}

impl Component for Greeting {
    fn on_key(&mut self, key: KeyEvent, context: Context) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Left => {
                self.selected = (self.selected + MODES.len() - 1) % MODES.len();
                None
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
                self.selected = (self.selected + 1) % MODES.len();
                None
            }
            KeyCode::Enter => {
                log::info!("Selected {}", MODES[self.selected].0);
                Some(Action::SwitchComponent(Box::new(Setup::new(
                    self.free_mode(),
                    context.rules.clan_names(),
                ))))
            }
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, _context: &Context) {
        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let container = center_rect(body, Constraint::Length(70), Constraint::Length(16));
        let block = framed_block("Welcome");
        let inner = block.inner(container);
        block.render(container, buffer);

        let mut lines = vec![
            Line::default(),
            Line::styled(constants::APP_TITLE, constants::title()).alignment(Alignment::Center),
            Line::default(),
            Line::styled("Please select a mode:", constants::text()),
            Line::default(),
        ];
        lines.extend(MODES.iter().enumerate().map(|(i, (name, _))| {
            if i == self.selected {
                Line::styled(format!("  {}{name}  ", constants::SYM_POINTER), constants::selected())
            } else {
                Line::styled(format!("    {name}  "), constants::text())
            }
        }));
        lines.push(Line::default());
        lines.push(Line::styled(
            "─".repeat(inner.width.saturating_sub(4) as usize),
            constants::border(),
        ));
        lines.push(Line::default());
        lines.extend(wrapped_lines(
            MODES[self.selected].1,
            inner.width.saturating_sub(6),
            constants::accent(),
        ));
        Paragraph::new(lines).render(inner.inner(ratatui::layout::Margin::new(2, 0)), buffer);

        Paragraph::new("↑/↓: Navigate | Enter: Select | Ctrl+X: Exit")
            .style(constants::accent())
            .alignment(Alignment::Center)
            .render(footer, buffer);
    }
}
