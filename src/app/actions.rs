//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never blocks on the terminal or on
//! child processes itself. It returns a `Vec<Action>` and the runtime executes
//! them in order, feeding results back as events where needed.

/// Commands executed by the terminal runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Suspends the display and runs the external editor on `seed`.
    ///
    /// The runtime answers with
    /// [`Event::EditorClosed`](super::Event::EditorClosed) carrying the
    /// stripped text, or `None` when the editor exited non-zero.
    SpawnEditor {
        seed: String,
    },

    /// Opens a web URL in the default browser.
    OpenUrl(String),

    /// Terminates the control loop.
    Quit,
}
