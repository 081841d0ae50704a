// fitdex-tui/src/main.rs
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fitdex_lib::AppService; // Use AppService from the lib
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{fs::File, io, time::Duration};

mod app; // Application state
mod ui; // UI rendering logic

use crate::app::App;

const LOG_FILE_NAME: &str = "fitdex-tui.log";

// Logs go to a file next to the database; stderr would draw over the UI.
fn init_logging() -> Result<()> {
    let log_path = fitdex_lib::get_db_path_util()?.with_file_name(LOG_FILE_NAME);
    let file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {log_path:?}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    // Initialize the library service
    let app_service =
        AppService::initialize().context("Failed to initialize application service")?;
    let tick_rate = Duration::from_millis(app_service.config.tick_rate_ms);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let mut app = App::new(app_service);
    let res = run_app(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}"); // Print errors to stderr
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick_rate: Duration) -> Result<()> {
    loop {
        // Collect finished fetches before drawing
        app.tick();

        terminal.draw(|f| ui::render_ui(f, app))?;

        // The timeout doubles as the polling interval for pending fetches
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
