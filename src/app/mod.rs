//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the terminal runtime and the data layers
//! (sources, filters, remote service). It implements the modal controller
//! that powers the interactive UI.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Key → Event → handle_event → State Mutations → Actions → Side Effects
//!                    ↑                                  ↓
//!                    └──────── EditorClosed ────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`editor`]: External editor integration and the display suspension hook
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: View and input mode state machine types
//! - [`state`]: Controller state container and view model computation
//! - [`templates`]: Editor seed texts and parsing of editor output
//! - [`view_model`]: Sources, filter chain and the displayed list

pub mod actions;
pub mod editor;
pub mod handler;
pub mod modes;
pub mod state;
pub mod templates;
pub mod view_model;

pub use actions::Action;
pub use editor::{Editor, ExternalEditor, NoSuspend, TerminalSuspend};
pub use handler::{handle_event, handle_with_editor, Event};
pub use modes::{DetailState, InputMode, Mode, Partition, PendingEdit};
pub use state::{AppState, LabelPicker};
pub use view_model::ViewModel;
