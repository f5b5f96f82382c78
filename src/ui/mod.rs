//! User interface rendering layer with component-based architecture.
//!
//! This module transforms view models into ANSI-styled terminal output
//! through composable rendering components. It provides theme support,
//! responsive layout, and fuzzy match highlighting.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_*_viewmodel → view model → Display → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: The [`Display`] seam and the top-level [`render`] entry point
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (highlighting, truncation)
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, AnsiDisplay, Display};
pub use theme::Theme;
pub use viewmodel::{
    DetailViewModel, DiffViewModel, DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo,
    UIViewModel,
};
