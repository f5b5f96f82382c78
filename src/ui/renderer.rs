//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **View Model Computation**: `AppState` computes the view model of its
//!    current mode (list, detail or diff)
//! 2. **Display**: a [`Display`] turns the view model into output
//!
//! [`AnsiDisplay`] is the terminal implementation. Tests substitute their own
//! [`Display`] to capture view models instead of escape sequences.

use crate::app::{AppState, Mode};
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DetailViewModel, DiffViewModel, UIViewModel};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use std::io::{self, Write};

/// Output surface for computed view models.
pub trait Display {
    fn render_list(&mut self, vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize);

    fn render_detail(&mut self, vm: &DetailViewModel, theme: &Theme, rows: usize, cols: usize);

    fn render_diff(&mut self, vm: &DiffViewModel, theme: &Theme, rows: usize, cols: usize);
}

/// Renders `state` to `display`, choosing the layout from the current mode.
///
/// # Example
///
/// ```rust
/// use issuedeck::app::AppState;
/// use issuedeck::remote::{InMemoryRemote, Repository};
/// use issuedeck::ui::{render, Display, Theme};
/// use issuedeck::ui::viewmodel::{DetailViewModel, DiffViewModel, UIViewModel};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Titles(Vec<String>);
///
/// impl Display for Titles {
///     fn render_list(&mut self, vm: &UIViewModel, _: &Theme, _: usize, _: usize) {
///         self.0.push(vm.header.title.clone());
///     }
///     fn render_detail(&mut self, vm: &DetailViewModel, _: &Theme, _: usize, _: usize) {
///         self.0.push(vm.header.title.clone());
///     }
///     fn render_diff(&mut self, vm: &DiffViewModel, _: &Theme, _: usize, _: usize) {
///         self.0.push(vm.header.title.clone());
///     }
/// }
///
/// let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
/// let repository = Repository::new("acme", "widgets");
/// let state = AppState::new(remote, repository, "alice", Theme::default())?;
///
/// let mut display = Titles::default();
/// render(&mut display, &state, 24, 80);
/// assert_eq!(display.0, vec![" Open Issues (0) ".to_string()]);
/// # Ok::<(), issuedeck::IssueDeckError>(())
/// ```
pub fn render(display: &mut dyn Display, state: &AppState, rows: usize, cols: usize) {
    match &state.mode {
        Mode::IssueList => {
            let vm = state.compute_viewmodel(rows, cols);
            display.render_list(&vm, &state.theme, rows, cols);
        }
        Mode::IssueDetail(_) | Mode::PrDetail(_) => {
            let vm = state.compute_detail_viewmodel(rows, cols);
            display.render_detail(&vm, &state.theme, rows, cols);
        }
        Mode::PrDiff { .. } => {
            let vm = state.compute_diff_viewmodel(rows, cols);
            display.render_diff(&vm, &state.theme, rows, cols);
        }
    }
}

/// Draws view models to stdout with ANSI escape sequences.
///
/// Every frame clears the screen first and flushes at the end.
#[derive(Debug, Default)]
pub struct AnsiDisplay;

impl AnsiDisplay {
    fn begin() {
        let mut out = io::stdout();
        if let Err(e) = queue!(out, Clear(ClearType::All), cursor::Hide) {
            tracing::warn!(error = %e, "failed to clear screen");
        }
    }

    fn finish() {
        if let Err(e) = io::stdout().flush() {
            tracing::warn!(error = %e, "failed to flush frame");
        }
    }
}

impl Display for AnsiDisplay {
    fn render_list(&mut self, vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
        Self::begin();
        components::render_list_mode(vm, theme, cols, rows);
        Self::finish();
    }

    fn render_detail(&mut self, vm: &DetailViewModel, theme: &Theme, rows: usize, cols: usize) {
        Self::begin();
        components::render_detail_mode(vm, theme, cols, rows);
        Self::finish();
    }

    fn render_diff(&mut self, vm: &DiffViewModel, theme: &Theme, rows: usize, cols: usize) {
        Self::begin();
        components::render_diff_mode(vm, theme, cols, rows);
        Self::finish();
    }
}
