//! VARCALC - Variable Calculator
//!
//! A terminal calculator notebook, built in Rust. Each sheet holds an
//! ordered list of rows; a row either assigns a variable (`x = 2 + 3`) or
//! queries an expression (`x * 2?`), and the whole sheet recomputes on
//! every edit. All sheets persist to a JSON snapshot between runs.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;

mod domain;
mod application;
mod infrastructure;
mod presentation;

use application::App;
use infrastructure::{StateRepository, STATE_FILE};
use presentation::{render_ui, InputHandler};

/// Entry point for the varcalc terminal application.
///
/// Restores the last saved workbook (or starts a fresh one), runs the
/// event loop, and snapshots the full state on the way out. A failed
/// snapshot is ignored: persistence is best-effort.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(StateRepository::load_or_default(STATE_FILE));
    let res = run_app(&mut terminal, &mut app);

    let _ = StateRepository::save_workbook(&app.workbook, STATE_FILE);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Handles terminal rendering and keyboard input processing.
/// Continues running until the user presses 'q' in normal mode.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, application::AppMode::Normal) => {
                        return Ok(())
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
