// ui/utils.rs

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::constants;

pub fn center_rect(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

/// A rounded box with the title set into the top border.
pub fn framed_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(constants::border())
        .title(Line::styled(format!(" {title} "), constants::highlight()))
}

pub fn section_header(name: &str) -> String {
    format!("{}{name}{}", constants::SYM_HEADER_L, constants::SYM_HEADER_R)
}

/// Wrapped lines of `text`, at most `width` columns each.
pub fn wrapped_lines(text: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    textwrap::wrap(text, width.max(1) as usize)
        .into_iter()
        .map(|line| Line::styled(line.into_owned(), style))
        .collect()
}

/// Clears a centered area and draws a titled modal with `lines` inside.
pub fn render_popup(
    area: Rect,
    buffer: &mut Buffer,
    title: &str,
    lines: Vec<Line<'static>>,
    width: u16,
) {
    let height = lines.len() as u16 + 4;
    let popup = center_rect(area, Constraint::Length(width), Constraint::Length(height));
    Clear.render(popup, buffer);
    Paragraph::new(lines)
        .block(framed_block(title).padding(ratatui::widgets::Padding::uniform(1)))
        .render(popup, buffer);
}

pub fn render_too_small(area: Rect, buffer: &mut Buffer) {
    Paragraph::new("Terminal too small. Please resize.")
        .style(constants::error())
        .alignment(Alignment::Center)
        .render(area, buffer);
}
