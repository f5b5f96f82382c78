//! issuedeck: a terminal client for a repository's issues and pull requests.
//!
//! issuedeck provides:
//! - Lazily fetched, cached lists of open issues, closed issues and pull requests
//! - Composable filters by label, participation and title search
//! - Keyboard-driven detail views, comment threads and pull request diffs
//! - Creating, closing, reopening, editing and commenting through `$EDITOR`

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs)                                   │  ← Repository resolution
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Key loop, raw mode
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Modal controller
//! │  - Event handling and actions                       │
//! │  - View model: sources + filter chain               │
//! │  - Editor round trips                               │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Data Layer    │   │ Remote Layer  │
//! │ (ui/)         │   │ (source/,     │   │ (remote/)     │
//! │ - Rendering   │   │  filter,      │   │ - gh CLI      │
//! │ - Theming     │   │  events)      │   │ - In-memory   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure, Domain & Observability             │
//! │  - Paths, git remotes, browser (infrastructure/)    │
//! │  - Issues, pull requests, errors (domain/)          │
//! │  - Rotating log file (observability/)               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Controller state machine with event/action model
//! - [`domain`]: Issue, pull request and comment snapshots, errors
//! - [`events`]: Named-event bus driving the list controls
//! - [`filter`]: Filter stages and their composition
//! - [`source`]: Cached per-partition access to the remote service
//! - [`remote`]: The remote service trait and implementations
//! - [`ui`]: Terminal rendering with theme support
//! - [`runtime`]: Terminal session and key loop
//! - [`infrastructure`]: Paths, git remotes and the browser
//! - [`observability`]: File-based tracing
//!
//! # Configuration
//!
//! Read from `$XDG_CONFIG_HOME/issuedeck/config.toml`; every key is optional:
//!
//! ```toml
//! editor = "nvim"
//! theme = "catppuccin-mocha"
//! theme_file = "/path/to/theme.toml"
//! trace_level = "debug"
//! parallel_bootstrap = true
//! remote_timeout_secs = 30
//! gh_binary = "/usr/local/bin/gh"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use issuedeck::domain::Issue;
//! use issuedeck::remote::{InMemoryRemote, Repository};
//! use issuedeck::{handle_event, initialize, Config, Event};
//! use std::sync::Arc;
//!
//! let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
//! remote.add_issue(Issue::new(1, "Crash on start", "bob"));
//! remote.add_issue(Issue::new(2, "Typo in docs", "alice"));
//!
//! let mut state = initialize(&Config::default(), remote, Repository::new("acme", "widgets"), "alice")?;
//! assert_eq!(state.view.items().len(), 2);
//!
//! handle_event(&mut state, &Event::ShowCreatedByYou)?;
//! assert_eq!(state.view.items().len(), 1);
//! # Ok::<(), issuedeck::IssueDeckError>(())
//! ```

pub mod app;
pub mod domain;
pub mod events;
pub mod filter;
pub mod infrastructure;
pub mod observability;
pub mod remote;
pub mod runtime;
pub mod source;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{IssueDeckError, Result};
pub use ui::Theme;

use remote::{RemoteService, Repository};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
///
/// Loaded from the TOML config file; see [`Config::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Editor command. Falls back to `$VISUAL`, `$EDITOR`, then `vim`.
    pub editor: Option<String>,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` loads.
    pub theme: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing level or `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Fetch every partition concurrently before the first render. Default: `true`
    pub parallel_bootstrap: bool,

    /// Deadline for a single `gh` invocation. Default: 30
    pub remote_timeout_secs: u64,

    /// Path of the `gh` binary. `ISSUEDECK_GH_BIN` wins over this.
    pub gh_binary: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: None,
            theme: None,
            theme_file: None,
            trace_level: None,
            parallel_bootstrap: true,
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            gh_binary: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    editor: Option<String>,
    theme: Option<String>,
    theme_file: Option<String>,
    trace_level: Option<String>,
    parallel_bootstrap: Option<bool>,
    remote_timeout_secs: Option<u64>,
    gh_binary: Option<String>,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            editor: non_empty(raw.editor),
            theme: non_empty(raw.theme),
            theme_file: non_empty(raw.theme_file),
            trace_level: non_empty(raw.trace_level),
            parallel_bootstrap: raw.parallel_bootstrap.unwrap_or(true),
            remote_timeout_secs: raw
                .remote_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS),
            gh_binary: non_empty(raw.gh_binary),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// Missing keys take their defaults and blank strings count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDeckError::Configuration`] for invalid TOML or unknown keys.
    ///
    /// # Example
    ///
    /// ```rust
    /// use issuedeck::Config;
    ///
    /// let config = Config::from_toml("theme = \"catppuccin-latte\"\nparallel_bootstrap = false")?;
    /// assert_eq!(config.theme.as_deref(), Some("catppuccin-latte"));
    /// assert!(!config.parallel_bootstrap);
    /// assert_eq!(config.remote_timeout_secs, 30);
    /// # Ok::<(), issuedeck::IssueDeckError>(())
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str::<RawConfig>(text)
            .map(Self::from)
            .map_err(|e| IssueDeckError::Configuration(format!("Invalid config: {e}")))
    }

    /// Loads the config file at `path`.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file is
    /// logged and also yields the defaults.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
                return Self::default();
            }
        };

        Self::from_toml(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
            Self::default()
        })
    }
}

/// Builds the controller state and shows the open issues.
///
/// # Parameters
///
/// * `config` - Theme and bootstrap settings
/// * `remote` - Service the sources read from
/// * `repository` - Repository being browsed
/// * `user` - Login of the authenticated user
///
/// # Side Effects
///
/// - Fetches every partition concurrently if `parallel_bootstrap` is set
/// - Fetches the open issues for the first list
///
/// A remote failure while loading the first list is kept as the state's
/// notice rather than returned.
///
/// # Errors
///
/// Returns an error only if the event bus cannot be set up.
pub fn initialize(
    config: &Config,
    remote: Arc<dyn RemoteService>,
    repository: Repository,
    user: &str,
) -> Result<AppState> {
    let _span = tracing::info_span!("initialize", repository = %repository.full_name(), user).entered();

    let theme = Theme::resolve(config.theme.as_deref(), config.theme_file.as_deref());
    let mut state = AppState::new(remote, repository, user, theme)?;

    if config.parallel_bootstrap {
        let failed = source::bootstrap_all(state.view.issues(), state.view.pulls());
        tracing::debug!(failed, "bootstrap finished");
    }

    handle_event(&mut state, &Event::ShowOpenIssues)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = Config::from_toml("editor = \"  \"\nremote_timeout_secs = 0").unwrap();
        assert_eq!(config.editor, None);
        assert_eq!(config.remote_timeout_secs, DEFAULT_REMOTE_TIMEOUT_SECS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_toml("scan_depth = 4"),
            Err(IssueDeckError::Configuration(_))
        ));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "editor = [").unwrap();
        assert_eq!(Config::load(&path), Config::default());

        std::fs::write(&path, "editor = \"hx\"\ngh_binary = \"/opt/gh\"").unwrap();
        let config = Config::load(&path);
        assert_eq!(config.editor.as_deref(), Some("hx"));
        assert_eq!(config.gh_binary.as_deref(), Some("/opt/gh"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(&dir.path().join("absent.toml")), Config::default());
    }
}
