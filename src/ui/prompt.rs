// ui/prompt.rs
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use tui_input::{Input, backend::crossterm::EventHandler};

use super::constants;

const MAX_INPUT_LEN: usize = 30;
const MAX_VISIBLE_CHOICES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Text,
    Number { min: u32, max: u32 },
    // Typed text filters the options; anything typed is accepted as-is.
    Choice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Pending,
    Cancelled,
    Text(String),
    Number(u32),
    Invalid(String),
}

/// A single-line input field that knows what answer it is waiting for.
#[derive(Debug)]
pub struct Prompt {
    label: String,
    kind: PromptKind,
    input: Input,
    cursor: Option<usize>,
}

impl Prompt {
    pub fn new(label: impl Into<String>, kind: PromptKind) -> Self {
        Self {
            label: label.into(),
            kind,
            input: Input::default(),
            cursor: None,
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        Self::new(label, PromptKind::Text)
    }

    pub fn number(label: impl Into<String>, min: u32, max: u32) -> Self {
        Self::new(label, PromptKind::Number { min, max })
    }

    pub fn choice(label: impl Into<String>, options: Vec<String>) -> Self {
        Self::new(label, PromptKind::Choice(options))
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.input = self.input.with_value(value.into());
        self
    }

    /// Options containing the typed text, ignoring case. Empty for non-choice prompts.
    pub fn matches(&self) -> Vec<&str> {
        let PromptKind::Choice(options) = &self.kind else {
            return Vec::new();
        };
        let typed = self.input.value().trim().to_lowercase();
        options
            .iter()
            .map(String::as_str)
            .filter(|option| option.to_lowercase().contains(&typed))
            .collect()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> PromptEvent {
        match key.code {
            KeyCode::Esc => PromptEvent::Cancelled,
            KeyCode::Enter => self.submit(),
            KeyCode::Up if matches!(self.kind, PromptKind::Choice(_)) => {
                self.cursor = match self.cursor {
                    Some(0) | None => None,
                    Some(i) => Some(i - 1),
                };
                PromptEvent::Pending
            }
            KeyCode::Down if matches!(self.kind, PromptKind::Choice(_)) => {
                let last = self.matches().len().min(MAX_VISIBLE_CHOICES);
                self.cursor = match self.cursor {
                    None if last > 0 => Some(0),
                    Some(i) if i + 1 < last => Some(i + 1),
                    other => other,
                };
                PromptEvent::Pending
            }
            KeyCode::Char(_) if self.input.value().chars().count() >= MAX_INPUT_LEN => {
                PromptEvent::Pending
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                self.cursor = None;
                PromptEvent::Pending
            }
        }
    }

    fn submit(&self) -> PromptEvent {
        let typed = self.input.value().trim();
        match &self.kind {
            PromptKind::Text if typed.is_empty() => PromptEvent::Pending,
            PromptKind::Text => PromptEvent::Text(typed.to_string()),
            PromptKind::Number { min, max } => match typed.parse::<u32>() {
                Ok(value) if (*min..=*max).contains(&value) => PromptEvent::Number(value),
                Ok(_) => {
                    PromptEvent::Invalid(format!("Please enter a number between {min} and {max}."))
                }
                Err(_) => {
                    PromptEvent::Invalid("That is not a valid number. Please try again.".into())
                }
            },
            PromptKind::Choice(options) => {
                if let Some(choice) = self.cursor.and_then(|i| self.matches().get(i).copied()) {
                    return PromptEvent::Text(choice.to_string());
                }
                if typed.is_empty() {
                    return PromptEvent::Pending;
                }
                // Keep the canonical spelling when the typed name is a known option.
                let canonical = options
                    .iter()
                    .find(|option| option.eq_ignore_ascii_case(typed))
                    .map_or(typed, String::as_str);
                PromptEvent::Text(canonical.to_string())
            }
        }
    }

    /// The prompt line (`Label: value_`) followed by any matching choices.
    pub fn lines(&self, label_style: Style) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{}: ", self.label), label_style),
            Span::styled(self.input.value().to_string(), constants::text()),
            Span::styled("_", constants::highlight()),
        ])];

        if matches!(self.kind, PromptKind::Choice(_)) {
            lines.extend(
                self.matches()
                    .into_iter()
                    .take(MAX_VISIBLE_CHOICES)
                    .enumerate()
                    .map(|(i, option)| {
                        if Some(i) == self.cursor {
                            Line::styled(
                                format!("  {}{option}", constants::SYM_POINTER),
                                constants::selected(),
                            )
                        } else {
                            Line::styled(format!("    {option}"), constants::border())
                        }
                    }),
            );
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(prompt: &mut Prompt, text: &str) {
        for c in text.chars() {
            prompt.on_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn number_prompt_checks_range() {
        let mut prompt = Prompt::number("Generation (2-16)", 2, 16);
        type_str(&mut prompt, "17");
        assert!(matches!(prompt.on_key(key(KeyCode::Enter)), PromptEvent::Invalid(_)));

        let mut prompt = Prompt::number("Generation (2-16)", 2, 16);
        type_str(&mut prompt, "8");
        assert_eq!(prompt.on_key(key(KeyCode::Enter)), PromptEvent::Number(8));
    }

    #[test]
    fn number_prompt_rejects_text() {
        let mut prompt = Prompt::number("Age", 0, 10000);
        type_str(&mut prompt, "old");
        assert_eq!(
            prompt.on_key(key(KeyCode::Enter)),
            PromptEvent::Invalid("That is not a valid number. Please try again.".into())
        );
    }

    #[test]
    fn empty_text_is_not_submitted() {
        let mut prompt = Prompt::text("Character Name");
        assert_eq!(prompt.on_key(key(KeyCode::Enter)), PromptEvent::Pending);
        assert_eq!(prompt.on_key(key(KeyCode::Esc)), PromptEvent::Cancelled);
    }

    #[test]
    fn choice_prompt_filters_and_selects() {
        let options = vec!["Brujah".to_string(), "Gangrel".to_string(), "City Gangrel".to_string()];
        let mut prompt = Prompt::choice("Clan", options);
        type_str(&mut prompt, "gang");
        assert_eq!(prompt.matches(), ["Gangrel", "City Gangrel"]);

        prompt.on_key(key(KeyCode::Down));
        prompt.on_key(key(KeyCode::Down));
        assert_eq!(
            prompt.on_key(key(KeyCode::Enter)),
            PromptEvent::Text("City Gangrel".into())
        );
    }

    #[test]
    fn choice_prompt_accepts_free_text_and_canonical_names() {
        let options = vec!["Gangrel".to_string()];
        let mut prompt = Prompt::choice("Clan", options.clone());
        type_str(&mut prompt, "gangrel");
        assert_eq!(prompt.on_key(key(KeyCode::Enter)), PromptEvent::Text("Gangrel".into()));

        let mut prompt = Prompt::choice("Clan", options);
        type_str(&mut prompt, "Homebrew");
        assert_eq!(prompt.on_key(key(KeyCode::Enter)), PromptEvent::Text("Homebrew".into()));
    }
}
