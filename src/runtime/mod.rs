//! Terminal runtime: raw mode, the key loop and action execution.
//!
//! ```text
//! crossterm key → map_key → handle_with_editor → actions → render
//! ```
//!
//! The terminal is set up by [`TerminalSession`] and restored when it drops,
//! including on early returns. While the external editor runs, the session
//! leaves raw mode and the alternate screen and takes them back afterwards.

pub mod keymap;

pub use keymap::map_key;

use crate::app::{handle_with_editor, Action, AppState, Editor, TerminalSuspend};
use crate::domain::error::Result;
use crate::infrastructure::open_url;
use crate::ui::{render, AnsiDisplay};
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use std::io;

/// Raw mode plus the alternate screen for the lifetime of the value.
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns the terminal error; the terminal is restored before returning.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide).inspect_err(|_| teardown_terminal())?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        teardown_terminal();
    }
}

impl TerminalSuspend for TerminalSession {
    fn suspend(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
            self.resume();
            return Err(e);
        }
        Ok(())
    }

    fn resume(&mut self) {
        let _ = enable_raw_mode();
        let _ = execute!(io::stdout(), EnterAlternateScreen, Clear(ClearType::All), cursor::Hide);
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Runs the interactive loop until the user quits.
///
/// # Errors
///
/// Returns terminal errors and controller errors that are not turned into a
/// notice, e.g. an unknown bus event.
pub fn run(state: &mut AppState, editor: &mut dyn Editor) -> Result<()> {
    let mut session = TerminalSession::new()?;
    let mut display = AnsiDisplay;
    draw(&mut display, state)?;

    loop {
        let app_event = match event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => map_key(key, state.input_mode, &state.mode),
            TermEvent::Resize(..) => {
                draw(&mut display, state)?;
                continue;
            }
            _ => None,
        };
        let Some(app_event) = app_event else {
            continue;
        };

        let (mut should_render, actions) = handle_with_editor(state, &app_event, editor, &mut session)?;
        tracing::debug!(action_count = actions.len(), should_render, "event handled");

        for action in actions {
            match action {
                Action::Quit => {
                    tracing::info!("quitting");
                    return Ok(());
                }
                Action::OpenUrl(url) => {
                    if let Err(e) = open_url(&url) {
                        tracing::warn!(%url, error = %e, "failed to open browser");
                        state.notice = Some(e.to_string());
                        should_render = true;
                    }
                }
                Action::SpawnEditor { .. } => {
                    tracing::debug!("editor action left over, ignoring");
                }
            }
        }

        if should_render {
            draw(&mut display, state)?;
        }
    }
}

fn draw(display: &mut AnsiDisplay, state: &AppState) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    render(display, state, usize::from(rows), usize::from(cols));
    Ok(())
}
