// ui/setup.rs
use std::collections::VecDeque;

use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::Line,
    widgets::{Paragraph, Widget},
};

use super::{
    Component, constants,
    progression::Progression,
    prompt::{Prompt, PromptEvent},
    utils::{center_rect, framed_block, wrapped_lines},
};
use crate::{
    app::Action,
    character::{Category, Character},
    context::Context,
    rules::{ABILITIES, ATTRIBUTES, VIRTUES, ordinal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Name,
    Clan,
    Age,
    Generation,
    Created,
    Trait(Category, &'static str),
}

impl Step {
    fn stage(self) -> &'static str {
        match self {
            Step::Name | Step::Clan | Step::Age | Step::Generation => "Character Setup",
            Step::Created => "Character Created",
            Step::Trait(Category::Attribute, _) => "Attributes",
            Step::Trait(Category::Ability, _) => "Abilities",
            Step::Trait(..) => "Virtues & Path",
        }
    }

    fn prompt(self, clans: &[String]) -> Option<Prompt> {
        let prompt = match self {
            Step::Name => Prompt::text("Character Name"),
            Step::Clan => Prompt::choice("Clan", clans.to_vec()),
            Step::Age => Prompt::number("Age (0-5600+)", 0, 10_000),
            Step::Generation => Prompt::number("Generation (2-16)", 2, 16),
            Step::Created => return None,
            Step::Trait(Category::Ability, name) => Prompt::number(name, 0, 10),
            Step::Trait(Category::Humanity, _) => Prompt::number("Humanity/Path", 1, 10),
            Step::Trait(_, name) => Prompt::number(name, 1, 10),
        };
        Some(prompt)
    }

    fn range_hint(self) -> Option<&'static str> {
        match self {
            Step::Trait(Category::Ability, _) => Some("Set initial values (0-10)"),
            Step::Trait(..) => Some("Set initial values (1-10)"),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Identity {
    name: String,
    clan: String,
    age: u32,
}

/// Identity prompts, then the initial value of every standard trait.
#[derive(Debug)]
pub struct Setup {
    free_mode: bool,
    clans: Vec<String>,
    steps: VecDeque<Step>,
    prompt: Option<Prompt>,
    identity: Identity,
    // Answers shown for the current stage.
    entered: Vec<(String, String)>,
    error: Option<String>,
}

impl Setup {
    pub fn new(free_mode: bool, clans: Vec<String>) -> Self {
        let mut steps: VecDeque<Step> =
            [Step::Name, Step::Clan, Step::Age, Step::Generation, Step::Created].into();
        steps.extend(ATTRIBUTES.iter().map(|a| Step::Trait(Category::Attribute, *a)));
        steps.extend(ABILITIES.iter().map(|a| Step::Trait(Category::Ability, *a)));
        steps.extend(VIRTUES.iter().map(|v| Step::Trait(Category::Virtue, *v)));
        steps.push_back(Step::Trait(Category::Humanity, "Humanity"));
        steps.push_back(Step::Trait(Category::Willpower, "Willpower"));

        let prompt = steps.front().and_then(|step| step.prompt(&clans));
        Self {
            free_mode,
            clans,
            steps,
            prompt,
            identity: Identity::default(),
            entered: Vec::new(),
            error: None,
        }
    }

    fn current(&self) -> Option<Step> {
        self.steps.front().copied()
    }

    fn advance(&mut self) -> Option<Action> {
        let finished = self.steps.pop_front();
        match (finished, self.current()) {
            (_, None) => {
                log::info!("Initial traits set, starting progression");
                return Some(Action::SwitchComponent(Box::new(Progression::new())));
            }
            (Some(prev), Some(next)) if prev.stage() != next.stage() && next != Step::Created => {
                self.entered.clear()
            }
            _ => {}
        }
        self.prompt = self.current().and_then(|step| step.prompt(&self.clans));
        None
    }

    fn apply(&mut self, step: Step, event: PromptEvent, context: &mut Context) -> Option<Action> {
        match (step, event) {
            (Step::Name, PromptEvent::Text(name)) => {
                self.entered.push(("Character Name".into(), name.clone()));
                self.identity.name = name;
            }
            (Step::Clan, PromptEvent::Text(clan)) => {
                self.entered.push(("Clan".into(), clan.clone()));
                self.identity.clan = clan;
            }
            (Step::Age, PromptEvent::Number(age)) => {
                self.entered.push(("Age".into(), age.to_string()));
                self.identity.age = age;
            }
            (Step::Generation, PromptEvent::Number(generation)) => {
                let generation = generation as u8;
                self.entered.push(("Generation".into(), ordinal(generation)));
                *context.character = Some(Character::with_rules(
                    self.identity.name.clone(),
                    self.identity.clan.clone(),
                    self.identity.age,
                    generation,
                    self.free_mode,
                    context.rules,
                ));
            }
            (Step::Trait(category, name), PromptEvent::Number(value)) => {
                let value = value as u8;
                let character = context.character.as_mut()?;
                character.set_initial_trait(category, name, value);
                let label = if category == Category::Humanity { "Humanity/Path" } else { name };
                self.entered.push((label.to_string(), value.to_string()));
            }
            _ => return None,
        }
        self.advance()
    }

    fn created_lines(&self, context: &Context) -> Vec<Line<'static>> {
        let freebies = match context.character.as_ref() {
            Some(character) if !character.is_free_mode() => format!(
                "Character created with {} Freebie Points!",
                character.budget()
            ),
            _ => "Freebie Points: Unlimited".to_string(),
        };
        vec![
            Line::default(),
            Line::styled(freebies, constants::accent()),
            Line::default(),
            Line::styled("Press any key to set initial traits...", constants::border()),
        ]
    }
}

impl Component for Setup {
    fn on_key(&mut self, key: KeyEvent, mut context: Context) -> Option<Action> {
        let step = self.current()?;
        if step == Step::Created {
            return self.advance();
        }

        let prompt = self.prompt.as_mut()?;
        match prompt.on_key(key) {
            // Every value is mandatory, Esc does not skip a step.
            PromptEvent::Pending | PromptEvent::Cancelled => None,
            PromptEvent::Invalid(message) => {
                self.error = Some(message);
                None
            }
            event => {
                self.error = None;
                self.apply(step, event, &mut context)
            }
        }
    }

    fn render(&mut self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let Some(step) = self.current() else {
            return;
        };
        let [banner, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(vec![Line::default(), Line::styled(constants::BANNER, constants::title())])
            .alignment(Alignment::Center)
            .render(banner, buffer);

        let height = if matches!(step, Step::Trait(..)) { 40 } else { 18 };
        let container = center_rect(body, Constraint::Length(60), Constraint::Max(height));
        let block = framed_block(step.stage());
        let inner = block.inner(container).inner(ratatui::layout::Margin::new(1, 1));
        block.render(container, buffer);

        let mut lines = Vec::new();
        if let Some(hint) = step.range_hint() {
            lines.push(Line::styled(hint, constants::border()));
            lines.push(Line::default());
        }

        // Keep the prompt visible once the stage outgrows the box.
        let reserved = lines.len() + 4;
        let visible = (inner.height as usize).saturating_sub(reserved);
        let skip = self.entered.len().saturating_sub(visible);
        lines.extend(
            self.entered
                .iter()
                .skip(skip)
                .map(|(label, value)| Line::styled(format!("{label}: {value}"), constants::accent())),
        );

        if step == Step::Created {
            lines.extend(self.created_lines(context));
        } else if let Some(prompt) = &self.prompt {
            lines.extend(prompt.lines(constants::highlight()));
        }
        if let Some(error) = &self.error {
            lines.push(Line::default());
            lines.extend(wrapped_lines(error, inner.width, constants::error()));
        }
        Paragraph::new(lines).render(inner, buffer);

        Paragraph::new("Enter: Confirm | Ctrl+X: Exit")
            .style(constants::accent())
            .alignment(Alignment::Center)
            .render(footer, buffer);
    }
}
