// /app.rs
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    character::Character,
    context::Context,
    rules::RuleTables,
    settings::Settings,
    tui::{Tui, TuiEvent},
    ui::{
        Component, MIN_HEIGHT, MIN_WIDTH, final_sheet::FinalSheet, greeting::Greeting,
        utils::render_too_small,
    },
};

pub enum Action {
    Quit,
    SwitchComponent(Box<dyn Component>),
}

pub struct App {
    running: bool,
    component: Box<dyn Component>,
    showing_final: bool,

    settings: Settings,
    rules: RuleTables,
    character: Option<Character>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let rules = settings.rules();
        Self {
            running: true,
            component: Box::new(Greeting::new(settings.free_mode_default)),
            showing_final: false,
            settings,
            rules,
            character: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(4.0) // 4 ticks per second
            .frame_rate(30.0); // 30 frames per second

        tui.enter()?; // Starts event handler, enters raw mode, enters alternate screen
        log::info!("Progression tool started");

        loop {
            tui.draw(|frame| {
                let area = frame.area();
                if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                    render_too_small(area, frame.buffer_mut());
                    return;
                }
                let context = Context {
                    settings: &self.settings,
                    rules: &self.rules,
                    character: &mut self.character,
                };
                self.component.render(area, frame.buffer_mut(), &context)
            })?;

            if let Some(event) = tui.next().await {
                // `tui.next().await` blocks till next event
                self.handle_tui_event(event);
            };

            if !self.running {
                break;
            }
        }

        tui.exit()?; // stops event handler, exits raw mode, exits alternate screen
        Ok(())
    }

    fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.on_key(key_event)
            }
            TuiEvent::Error => log::error!("Failed to read a terminal event"),
            TuiEvent::Key(_) => {}
            TuiEvent::Init => {}
            TuiEvent::Tick => {}
            TuiEvent::Render => {}
            TuiEvent::Resize(_, _) => {}
        }
    }

    fn on_key(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('x') && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.unwind();
            return;
        }

        if let Some(action) = self.component.on_key(
            key_event,
            Context {
                settings: &self.settings,
                rules: &self.rules,
                character: &mut self.character,
            },
        ) {
            self.handle_action(action)
        };
    }

    // Ctrl+X: out to the final sheet once a character exists, otherwise out of the program.
    fn unwind(&mut self) {
        if self.character.is_some() && !self.showing_final {
            self.showing_final = true;
            self.handle_action(Action::SwitchComponent(Box::new(FinalSheet::new())));
        } else {
            self.quit();
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::SwitchComponent(component) => {
                log::debug!("Switching screen");
                self.component = component;
            }
            Action::Quit => self.quit(),
        }
    }

    fn quit(&mut self) {
        if let Some(character) = &self.character {
            log::info!(
                "Leaving with {} ({})",
                character.name(),
                character.freebie_summary()
            );
        }
        self.running = false;
    }
}
