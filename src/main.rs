use std::panic;

use vtm_progression::{app::App, cleanup::cleanup, logging, settings};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (settings, load_error) = match settings::Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (settings::Settings::default(), Some(e)),
    };
    match settings::data_dir() {
        Ok(data_dir) => {
            if let Err(e) = logging::init(data_dir, settings.debug_mode) {
                eprintln!("Failed to initialize logging: {e}");
            }
        }
        Err(e) => eprintln!("Failed to initialize logging: {e}"),
    }
    if let Some(e) = load_error {
        log::error!("Could not load settings, using defaults for this session: {e}");
    }

    // Give the terminal back before the panic report is printed.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup();
        log::error!("{panic_info}");
        default_hook(panic_info);
    }));

    let mut app = App::new(settings);
    let result = app.run().await;
    if let Err(e) = &result {
        log::error!("Application error: {e:?}");
    }
    result
}
