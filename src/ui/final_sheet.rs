// ui/final_sheet.rs
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Widget},
};

use super::{
    Component, constants,
    prompt::{Prompt, PromptEvent},
    utils::{center_rect, framed_block, render_popup, section_header, wrapped_lines},
};
use crate::{
    app::Action,
    character::{Category, Character, TraitRecord},
    context::Context,
    export::{default_export_filename, export_character},
    rules::ordinal,
};

const NAME_WIDTH: usize = 19;

fn trait_line(name: &str, record: TraitRecord) -> Line<'static> {
    let style = if record.is_modified() {
        constants::accent()
    } else {
        constants::text()
    };
    Line::styled(format!("{name:<NAME_WIDTH$} {}", record.rating_label()), style)
}

fn section(lines: &mut Vec<Line<'static>>, title: &str, traits: Vec<Line<'static>>) {
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines.push(Line::styled(section_header(title), constants::accent()));
    lines.extend(traits);
}

fn pool_lines(character: &Character, category: Category, rated_only: bool) -> Vec<Line<'static>> {
    character
        .pool(category)
        .into_iter()
        .flatten()
        .filter(|(_, record)| !rated_only || record.current > 0)
        .map(|(name, record)| trait_line(name, *record))
        .collect()
}

/// Attributes and rated abilities on the left, everything else on the right.
fn sheet_columns(character: &Character) -> (Vec<Line<'static>>, Vec<Line<'static>>) {
    let mut left = Vec::new();
    section(&mut left, "ATTRIBUTES", pool_lines(character, Category::Attribute, false));
    section(&mut left, "ABILITIES", pool_lines(character, Category::Ability, true));

    let mut right = Vec::new();
    for category in [Category::Discipline, Category::Background] {
        let traits = pool_lines(character, category, false);
        if !traits.is_empty() {
            section(&mut right, category.section_title(), traits);
        }
    }
    let mut virtues = pool_lines(character, Category::Virtue, false);
    virtues.push(trait_line("Humanity", character.humanity()));
    virtues.push(trait_line("Willpower", character.willpower()));
    section(&mut right, "VIRTUES", virtues);

    (left, right)
}

/// Read-only sheet shown once progression is done, with text export.
#[derive(Debug, Default)]
pub struct FinalSheet {
    export: Option<Prompt>,
    message: Option<(String, Style)>,
}

impl FinalSheet {
    pub fn new() -> Self {
        Self::default()
    }

    fn on_export_key(&mut self, key: KeyEvent, context: &Context) {
        let Some(prompt) = self.export.as_mut() else {
            return;
        };
        let filename = match prompt.on_key(key) {
            PromptEvent::Text(filename) => filename,
            PromptEvent::Cancelled => {
                self.export = None;
                return;
            }
            _ => return,
        };
        self.export = None;

        let Some(character) = context.character.as_ref() else {
            return;
        };
        self.message = Some(
            match export_character(character, &context.settings.export_dir, &filename) {
                Ok(path) => (
                    format!("Character exported to {}", path.display()),
                    constants::accent(),
                ),
                Err(err) => {
                    log::error!("Export failed: {err}");
                    (format!("Export failed: {err}"), constants::error())
                }
            },
        );
    }
}

impl Component for FinalSheet {
    fn on_key(&mut self, key: KeyEvent, context: Context) -> Option<Action> {
        if self.export.is_some() {
            self.on_export_key(key, &context);
            return None;
        }
        match key.code {
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let name = context.character.as_ref().map_or("", |c| c.name());
                self.export = Some(Prompt::text("Filename").with_value(default_export_filename(name)));
                self.message = None;
                None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter => {
                Some(Action::Quit)
            }
            _ => None,
        }
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let Some(character) = context.character.as_ref() else {
            return;
        };
        let container = center_rect(area, Constraint::Max(110), Constraint::Max(55));
        let block = framed_block("FINAL CHARACTER SHEET");
        let inner = block.inner(container).inner(Margin::new(2, 1));
        block.render(container, buffer);

        let [header, _, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(inner);

        Paragraph::new(vec![
            Line::styled(
                format!("{} ({})", character.name(), character.clan()),
                constants::title(),
            ),
            Line::styled(
                format!(
                    "Age: {} | Gen: {} | Max: {}",
                    character.age(),
                    ordinal(character.generation()),
                    character.max_trait_rating()
                ),
                constants::border(),
            ),
            Line::styled(character.freebie_summary(), constants::accent()),
        ])
        .render(header, buffer);

        let (left, right) = sheet_columns(character);
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Length(32), Constraint::Fill(1)])
                .spacing(4)
                .areas(body);
        Paragraph::new(left).render(left_area, buffer);
        Paragraph::new(right).render(right_area, buffer);

        let footer_lines = match &self.message {
            Some((text, style)) => wrapped_lines(text, footer.width, *style),
            None => vec![Line::styled("e: Export | q/Esc: Exit", constants::border())],
        };
        Paragraph::new(footer_lines)
            .alignment(Alignment::Center)
            .render(footer, buffer);

        if let Some(prompt) = &self.export {
            let mut lines = prompt.lines(constants::highlight());
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("Directory: {}", context.settings.export_dir.display()),
                constants::border(),
            ));
            render_popup(area, buffer, "Export Character", lines, 60);
        }
    }
}
