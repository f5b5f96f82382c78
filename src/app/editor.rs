//! External editor integration.
//!
//! Editing happens in a temporary `.markdown` file opened in the user's
//! editor. The display is suspended for the editor's lifetime and restored
//! afterwards by a guard, and the file is removed on every exit path.

use super::templates::strip_comments;
use crate::domain::error::{IssueDeckError, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Fallback when neither the config nor the environment names an editor.
pub const DEFAULT_EDITOR: &str = "vim";

/// A display that can hand the terminal over to a child process.
pub trait TerminalSuspend {
    /// Leaves the display so a child process can own the terminal.
    ///
    /// # Errors
    ///
    /// Returns the terminal error if the display could not be left.
    fn suspend(&mut self) -> io::Result<()>;

    /// Takes the terminal back. Failures are ignored.
    fn resume(&mut self);
}

/// Display stand-in for headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSuspend;

impl TerminalSuspend for NoSuspend {
    fn suspend(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn resume(&mut self) {}
}

/// Resumes the display when dropped.
struct Suspended<'a> {
    display: &'a mut dyn TerminalSuspend,
}

impl<'a> Suspended<'a> {
    fn enter(display: &'a mut dyn TerminalSuspend) -> io::Result<Self> {
        display.suspend()?;
        Ok(Self { display })
    }
}

impl Drop for Suspended<'_> {
    fn drop(&mut self) {
        self.display.resume();
    }
}

/// Something that lets the user edit a text buffer.
pub trait Editor {
    /// Edits `seed` and returns the result with comment blocks stripped.
    ///
    /// `Ok(None)` means the user cancelled. `Ok(Some(""))` is a valid answer;
    /// callers decide whether empty text is acceptable.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDeckError::Editor`] if the editor could not be started
    /// and [`IssueDeckError::Io`] if the buffer could not be written or read.
    fn edit(&mut self, seed: &str, display: &mut dyn TerminalSuspend) -> Result<Option<String>>;
}

/// Runs the user's editor through `sh -c` on a temporary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    /// Uses `configured` when set, else `$VISUAL`, else `$EDITOR`, else
    /// [`DEFAULT_EDITOR`].
    #[must_use]
    pub fn new(configured: Option<&str>) -> Self {
        Self {
            command: resolve_editor_command(configured),
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Editor for ExternalEditor {
    fn edit(&mut self, seed: &str, display: &mut dyn TerminalSuspend) -> Result<Option<String>> {
        let mut buffer = tempfile::Builder::new()
            .prefix("issuedeck-")
            .suffix(".markdown")
            .tempfile()?;
        buffer.write_all(seed.as_bytes())?;
        buffer.flush()?;

        let status = {
            let _suspended = Suspended::enter(display)?;
            launch_editor_command(&self.command, buffer.path())?
        };

        if !status.success() {
            tracing::debug!(command = %self.command, %status, "editor exited non-zero, treating as cancelled");
            return Ok(None);
        }

        // Read by path: some editors replace the file instead of writing in place.
        let contents = fs::read_to_string(buffer.path())?;
        Ok(Some(strip_comments(&contents)))
    }
}

fn resolve_editor_command(configured: Option<&str>) -> String {
    let non_empty = |value: String| (!value.trim().is_empty()).then_some(value);
    configured
        .map(str::to_string)
        .and_then(non_empty)
        .or_else(|| env::var("VISUAL").ok().and_then(non_empty))
        .or_else(|| env::var("EDITOR").ok().and_then(non_empty))
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

fn launch_editor_command(command: &str, path: &Path) -> Result<ExitStatus> {
    let path_text = path.to_string_lossy();
    if path_text.starts_with('-') {
        return Err(IssueDeckError::Editor("invalid editor temp path".to_string()));
    }

    let _span = tracing::debug_span!("editor", command).entered();
    Command::new("sh")
        .arg("-c")
        .arg(format!("{command} {}", shell_single_quote(&path_text)))
        .status()
        .map_err(|e| IssueDeckError::Editor(format!("failed to run editor command `{command}`: {e}")))
}

fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        suspended: usize,
        resumed: usize,
    }

    impl TerminalSuspend for Recording {
        fn suspend(&mut self) -> io::Result<()> {
            self.suspended += 1;
            Ok(())
        }

        fn resume(&mut self) {
            self.resumed += 1;
        }
    }

    fn editor(command: &str) -> ExternalEditor {
        ExternalEditor::new(Some(command))
    }

    #[test]
    fn unchanged_buffer_comes_back_stripped() {
        let mut display = Recording::default();
        let text = editor("true")
            .edit("keep me\n<!-- drop me -->", &mut display)
            .unwrap();

        assert_eq!(text.as_deref(), Some("keep me"));
        assert_eq!((display.suspended, display.resumed), (1, 1));
    }

    #[test]
    fn written_buffer_is_returned() {
        let text = editor("printf 'Fix bug\\n\\nSteps to reproduce' >")
            .edit("", &mut NoSuspend)
            .unwrap();
        assert_eq!(text.as_deref(), Some("Fix bug\n\nSteps to reproduce"));
    }

    #[test]
    fn non_zero_exit_is_a_cancellation() {
        let mut display = Recording::default();
        let text = editor("false").edit("seed", &mut display).unwrap();

        assert_eq!(text, None);
        assert_eq!(display.resumed, 1);
    }

    #[test]
    fn buffer_is_removed_after_editing() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("path.txt");
        let command = format!("printf %s > {}", shell_single_quote(&log.to_string_lossy()));

        editor(&command).edit("seed", &mut NoSuspend).unwrap();

        let buffer = fs::read_to_string(&log).unwrap();
        assert!(buffer.ends_with(".markdown"));
        assert!(!Path::new(&buffer).exists());
    }

    #[test]
    fn configured_command_wins_over_environment() {
        assert_eq!(resolve_editor_command(Some("nano")), "nano");
        assert_ne!(resolve_editor_command(Some("   ")), "   ");
    }

    #[test]
    fn single_quotes_are_escaped() {
        assert_eq!(shell_single_quote("it's"), "'it'\\''s'");
    }
}
