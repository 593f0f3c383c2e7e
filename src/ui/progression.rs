// ui/progression.rs
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::{
    Component, constants,
    prompt::{Prompt, PromptEvent},
    utils::{framed_block, render_popup, section_header, wrapped_lines},
};
use crate::{
    app::Action,
    character::{Budget, Category, Character},
    context::Context,
    error::LedgerError,
    rules::{ABILITIES, ATTRIBUTES, BACKGROUNDS, DISCIPLINES, VIRTUES, ordinal},
};

const COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Header(&'static str),
    Spacer,
    Trait(Category, String),
    Add(Category),
}

impl Row {
    fn is_selectable(&self) -> bool {
        matches!(self, Row::Trait(..) | Row::Add(_))
    }
}

fn trait_rows(category: Category, names: impl IntoIterator<Item = String>) -> Vec<Row> {
    names
        .into_iter()
        .map(|name| Row::Trait(category, name))
        .collect()
}

fn fixed_rows(category: Category, names: &[&str]) -> Vec<Row> {
    trait_rows(category, names.iter().map(|name| name.to_string()))
}

fn pool_rows(character: &Character, category: Category) -> Vec<Row> {
    let names = character
        .pool(category)
        .map(|pool| pool.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    trait_rows(category, names)
}

/// The three progression columns, rebuilt from the sheet on every frame.
fn columns(character: &Character) -> [Vec<Row>; COLUMNS] {
    let mut first = vec![Row::Header("ATTRIBUTES")];
    first.extend(fixed_rows(Category::Attribute, &ATTRIBUTES));

    let mut second = vec![Row::Header("ABILITIES")];
    second.extend(fixed_rows(Category::Ability, &ABILITIES));

    let mut third = vec![Row::Header("DISCIPLINES")];
    third.extend(pool_rows(character, Category::Discipline));
    third.push(Row::Add(Category::Discipline));
    third.push(Row::Spacer);
    third.push(Row::Header("BACKGROUNDS"));
    third.extend(pool_rows(character, Category::Background));
    third.push(Row::Add(Category::Background));
    third.push(Row::Spacer);
    third.push(Row::Header("VIRTUES"));
    third.extend(fixed_rows(Category::Virtue, &VIRTUES));
    third.push(Row::Spacer);
    third.push(Row::Header("PATH/WILLPOWER"));
    third.push(Row::Trait(Category::Humanity, "Humanity".to_string()));
    third.push(Row::Trait(Category::Willpower, "Willpower".to_string()));

    [first, second, third]
}

/// Addable names for a pool, minus what the sheet already carries.
fn add_options(character: &Character, category: Category) -> Vec<String> {
    let catalogue: &[&str] = match category {
        Category::Discipline => &DISCIPLINES,
        Category::Background => &BACKGROUNDS,
        _ => &[],
    };
    let existing = character.pool(category);
    let mut options: Vec<String> = catalogue
        .iter()
        .filter(|name| !existing.is_some_and(|pool| pool.contains_key(**name)))
        .map(|name| name.to_string())
        .collect();
    options.sort();
    options
}

/// `1`-`9` set that value, `0` sets 10.
fn digit_target(c: char) -> Option<u8> {
    match c.to_digit(10)? {
        0 => Some(10),
        d => Some(d as u8),
    }
}

#[derive(Debug)]
enum Mode {
    Browse,
    Adding { category: Category, prompt: Prompt },
    ConfirmRemove { category: Category, name: String, refund: i32 },
}

#[derive(Debug)]
struct Message {
    text: String,
    style: Style,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Message { text: text.into(), style: constants::accent() }
    }

    fn plain(text: impl Into<String>) -> Self {
        Message { text: text.into(), style: constants::text() }
    }

    fn error(text: impl Into<String>) -> Self {
        Message { text: text.into(), style: constants::error() }
    }
}

/// Three-column spending screen.
#[derive(Debug)]
pub struct Progression {
    column: usize,
    row: usize,
    mode: Mode,
    message: Option<Message>,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            column: 0,
            row: 1,
            mode: Mode::Browse,
            message: None,
        }
    }

    fn selected<'a>(&self, columns: &'a [Vec<Row>; COLUMNS]) -> Option<&'a Row> {
        columns[self.column].get(self.row)
    }

    // Lands on the nearest selectable row at or after `row`, else before it.
    fn settle(&mut self, rows: &[Row]) {
        let row = self.row.min(rows.len().saturating_sub(1));
        self.row = rows
            .iter()
            .enumerate()
            .skip(row)
            .find(|(_, r)| r.is_selectable())
            .or_else(|| rows.iter().enumerate().take(row).rfind(|(_, r)| r.is_selectable()))
            .map_or(0, |(i, _)| i);
    }

    fn move_cursor(&mut self, rows: &[Row], down: bool) {
        let next = if down {
            rows.iter()
                .enumerate()
                .skip(self.row + 1)
                .find(|(_, r)| r.is_selectable())
        } else {
            rows.iter()
                .enumerate()
                .take(self.row)
                .rfind(|(_, r)| r.is_selectable())
        };
        if let Some((i, _)) = next {
            self.row = i;
        }
    }

    fn modify(&mut self, character: &mut Character, row: &Row, target: Option<u8>, quiet: bool) {
        let Row::Trait(category, name) = row else {
            return;
        };
        let Some(target) = target else {
            return;
        };
        self.message = match character.improve_trait(*category, name, target) {
            Ok(change) => Some(Message::info(change.to_string())),
            Err(err @ LedgerError::InsufficientPoints { .. }) => Some(Message::error(err.to_string())),
            // Arrow keys stop silently at the floor and ceiling.
            Err(_) if quiet => None,
            Err(err) => Some(Message::error(err.to_string())),
        };
    }

    fn step(&mut self, character: &mut Character, row: &Row, delta: i8) {
        let Row::Trait(category, name) = row else {
            return;
        };
        let current = character.trait_data(*category, name).current;
        let target = current.checked_add_signed(delta);
        self.modify(character, row, target, true);
    }

    fn request_removal(&mut self, character: &Character, row: &Row) {
        match row {
            Row::Trait(category, name) if category.is_extensible() => {
                let record = character.trait_data(*category, name);
                self.mode = Mode::ConfirmRemove {
                    category: *category,
                    name: name.clone(),
                    refund: record.bought() * character.cost_per_dot(*category),
                };
            }
            _ => {
                self.message = Some(Message::error(
                    "Can only remove added Disciplines or Backgrounds.",
                ))
            }
        }
    }

    fn on_browse_key(&mut self, key: KeyEvent, character: &mut Character) {
        let columns = columns(character);
        self.settle(&columns[self.column]);
        let Some(row) = self.selected(&columns).cloned() else {
            return;
        };

        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.move_cursor(&columns[self.column], key.code == KeyCode::Down);
                self.message = None;
            }
            KeyCode::Tab | KeyCode::Char(' ') => {
                self.column = (self.column + 1) % COLUMNS;
                self.row = 0;
                self.settle(&columns[self.column]);
                self.message = None;
            }
            KeyCode::BackTab => {
                self.column = (self.column + COLUMNS - 1) % COLUMNS;
                self.row = 0;
                self.settle(&columns[self.column]);
                self.message = None;
            }
            KeyCode::Left => self.step(character, &row, -1),
            KeyCode::Right => self.step(character, &row, 1),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.modify(character, &row, digit_target(c), false)
            }
            KeyCode::Char('x') | KeyCode::Delete => self.request_removal(character, &row),
            KeyCode::Enter => {
                if let Row::Add(category) = row {
                    self.mode = Mode::Adding {
                        category,
                        prompt: Prompt::choice(
                            format!("New {category}"),
                            add_options(character, category),
                        ),
                    };
                }
            }
            _ => {}
        }
    }

    fn on_adding_key(&mut self, key: KeyEvent, character: &mut Character) {
        let Mode::Adding { category, prompt } = &mut self.mode else {
            return;
        };
        let category = *category;
        match prompt.on_key(key) {
            PromptEvent::Pending | PromptEvent::Invalid(_) | PromptEvent::Number(_) => return,
            PromptEvent::Cancelled => self.message = Some(Message::plain("Cancelled")),
            PromptEvent::Text(name) => {
                self.message = Some(match character.add_trait(category, &name) {
                    Ok(()) => Message::info(format!("Added {name}")),
                    Err(err) => Message::error(err.to_string()),
                });
            }
        }
        self.mode = Mode::Browse;
    }

    fn on_confirm_key(&mut self, key: KeyEvent, character: &mut Character) {
        let Mode::ConfirmRemove { category, name, .. } = &self.mode else {
            return;
        };
        let (category, name) = (*category, name.clone());
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.message = Some(match character.remove_trait(category, &name) {
                    Ok(removal) => Message::info(removal.to_string()),
                    Err(err) => Message::error(err.to_string()),
                });
                self.row = self.row.saturating_sub(1);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.message = Some(Message::plain("Deletion cancelled."));
            }
            _ => return,
        }
        self.mode = Mode::Browse;
    }

    fn header_lines(character: &Character) -> Vec<Line<'static>> {
        let info = format!(
            "{} ({}) | Age: {} | Gen: {} | Max: {}",
            character.name(),
            character.clan(),
            character.age(),
            ordinal(character.generation()),
            character.max_trait_rating()
        );
        let freebies = match (character.budget(), character.remaining_freebies()) {
            (Budget::Capped(total), Some(remaining)) => {
                let style = if remaining > 0 { constants::accent() } else { constants::error() };
                Line::styled(format!("Freebie: {remaining}/{total}"), style)
            }
            _ => Line::styled(
                format!("Freebie Points Spent: {}", character.spent_freebies()),
                constants::accent(),
            ),
        };
        vec![Line::styled(info, constants::title()), freebies]
    }

    fn row_line(&self, character: &Character, row: &Row, selected: bool, width: u16) -> Line<'static> {
        let name_width = (width as usize).saturating_sub(10);
        match row {
            Row::Header(title) => {
                Line::styled(section_header(title), constants::border()).alignment(Alignment::Center)
            }
            Row::Spacer => Line::default(),
            Row::Add(category) => {
                let text = format!("[ Add {category} ]");
                if selected {
                    Line::styled(
                        format!("{}{text:<name_width$}{}", constants::SYM_SELECTED_L, constants::SYM_SELECTED_R),
                        constants::highlight(),
                    )
                } else {
                    Line::styled(format!("  {text}"), constants::border())
                }
            }
            Row::Trait(category, name) => {
                let record = character.trait_data(*category, name);
                let label = if *category == Category::Humanity {
                    "Humanity/Path"
                } else {
                    name.as_str()
                };
                let value = format!("[{}]", record.current);
                if selected {
                    return Line::styled(
                        format!(
                            "{}{label:<name_width$}{value}{}",
                            constants::SYM_SELECTED_L,
                            constants::SYM_SELECTED_R
                        ),
                        constants::highlight(),
                    );
                }
                let style = if record.is_modified() || category.is_extensible() {
                    constants::accent()
                } else {
                    constants::text()
                };
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{label:<name_width$}{value}"), style),
                ])
            }
        }
    }

    fn render_column(
        &self,
        area: Rect,
        buffer: &mut Buffer,
        character: &Character,
        rows: &[Row],
        index: usize,
    ) {
        let visible = area.height as usize;
        let active = index == self.column && matches!(self.mode, Mode::Browse | Mode::ConfirmRemove { .. });
        let offset = if index == self.column && self.row >= visible {
            self.row + 1 - visible
        } else {
            0
        };
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, row)| self.row_line(character, row, active && i == self.row, area.width))
            .collect();
        Paragraph::new(lines).render(area, buffer);

        // The add prompt is drawn in place of its row.
        if let (Mode::Adding { prompt, .. }, true) = (&self.mode, index == self.column) {
            let y = self.row.saturating_sub(offset) as u16;
            if y < area.height {
                let prompt_area = Rect {
                    y: area.y + y,
                    height: area.height - y,
                    ..area
                };
                ratatui::widgets::Clear.render(prompt_area, buffer);
                Paragraph::new(prompt.lines(constants::highlight()))
                    .block(Block::default().borders(Borders::LEFT).border_style(constants::border()))
                    .render(prompt_area, buffer);
            }
        }
    }
}

impl Component for Progression {
    fn on_key(&mut self, key: KeyEvent, context: Context) -> Option<Action> {
        let character = context.character.as_mut()?;
        match self.mode {
            Mode::Browse => self.on_browse_key(key, character),
            Mode::Adding { .. } => self.on_adding_key(key, character),
            Mode::ConfirmRemove { .. } => self.on_confirm_key(key, character),
        }
        None
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let Some(character) = context.character.as_ref() else {
            return;
        };
        let columns = columns(character);
        if matches!(self.mode, Mode::Browse) {
            self.settle(&columns[self.column]);
        }

        let block = framed_block(constants::APP_TITLE);
        let inner = block.inner(area).inner(Margin::new(1, 0));
        block.render(area, buffer);

        let [header, _, body, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(inner);

        Paragraph::new(Self::header_lines(character)).render(header, buffer);

        let areas: [Rect; COLUMNS] = Layout::horizontal([Constraint::Ratio(1, 3); COLUMNS])
            .spacing(1)
            .areas(body);
        for (index, (rows, column_area)) in columns.iter().zip(areas).enumerate() {
            if index > 0 {
                Block::default()
                    .borders(Borders::LEFT)
                    .border_style(constants::border())
                    .render(column_area, buffer);
            }
            let content = Rect {
                x: column_area.x + 1,
                width: column_area.width.saturating_sub(1),
                ..column_area
            };
            self.render_column(content, buffer, character, rows, index);
        }

        let footer_lines = match &self.message {
            Some(message) => wrapped_lines(&message.text, footer.width, message.style),
            None => vec![Line::styled(constants::CONTROLS_PROGRESSION, constants::accent())],
        };
        Paragraph::new(footer_lines)
            .alignment(Alignment::Center)
            .render(footer, buffer);

        if let Mode::ConfirmRemove { name, refund, .. } = &self.mode {
            let lines = vec![
                Line::styled(
                    format!("Are you sure you want to completely remove {name}?"),
                    constants::text(),
                ),
                Line::default(),
                Line::styled(
                    format!("This will refund {refund} Freebie Points."),
                    constants::accent(),
                ),
                Line::default(),
                Line::styled("y/Enter: Confirm | n/Esc: Cancel", constants::border()),
            ];
            render_popup(area, buffer, "Confirm Deletion", lines, 60);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        let mut character = Character::new("Marcus", "Gangrel", 100, 8, false);
        for attribute in ATTRIBUTES {
            character.set_initial_trait(Category::Attribute, attribute, 1);
        }
        character
    }

    #[test]
    fn zero_key_means_ten() {
        assert_eq!(digit_target('0'), Some(10));
        assert_eq!(digit_target('3'), Some(3));
        assert_eq!(digit_target('a'), None);
    }

    #[test]
    fn third_column_lists_clan_disciplines_then_add_rows() {
        let [_, _, third] = columns(&character());
        assert_eq!(third[0], Row::Header("DISCIPLINES"));
        assert_eq!(third[1], Row::Trait(Category::Discipline, "Animalism".into()));
        assert_eq!(third[4], Row::Add(Category::Discipline));
        assert_eq!(third.last(), Some(&Row::Trait(Category::Willpower, "Willpower".into())));
    }

    #[test]
    fn cursor_skips_headers_and_spacers() {
        let [_, _, third] = columns(&character());
        let mut view = Progression::new();
        view.column = 2;
        view.row = 4;
        view.move_cursor(&third, true);
        assert_eq!(view.row, 7);
        assert_eq!(third[view.row], Row::Add(Category::Background));

        view.move_cursor(&third, false);
        assert_eq!(view.row, 4);
    }

    #[test]
    fn add_options_exclude_existing_disciplines() {
        let options = add_options(&character(), Category::Discipline);
        assert!(!options.iter().any(|o| o == "Protean"));
        assert!(options.iter().any(|o| o == "Auspex"));
        assert!(options.windows(2).all(|w| w[0] <= w[1]));
    }
}
