//! Theme management and ANSI escape sequence generation.
//!
//! Supports built-in themes (Catppuccin variants) and custom themes loaded from
//! TOML files. Colors are hex strings converted to 24-bit ANSI sequences.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! open_fg = "#a6e3a1"
//! closed_fg = "#f38ba8"
//! label_fg = "#f9e2af"
//! diff_add = "#a6e3a1"
//! diff_remove = "#f38ba8"
//! diff_hunk = "#89dceb"
//! notice_fg = "#f38ba8"
//! ```
//!
//! # Example
//!
//! ```rust
//! use issuedeck::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-mocha").unwrap();
//! println!("{}", Theme::fg(&theme.colors.header_fg));
//! println!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! ```

use crate::domain::error::{IssueDeckError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when nothing else is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements.
///
/// All colors are hex strings (e.g., "#cdd6f4").
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Header text color.
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Selected row foreground color.
    pub selection_fg: String,
    /// Selected row background color.
    pub selection_bg: String,

    /// Normal text color.
    pub text_normal: String,
    /// Dimmed text color (footer, secondary info).
    pub text_dim: String,

    /// Border and separator line color.
    pub border: String,

    /// Search bar border color.
    pub search_bar_border: String,
    /// Fuzzy match highlight foreground.
    pub match_highlight_fg: String,
    /// Fuzzy match highlight background.
    pub match_highlight_bg: String,

    /// Empty state message color.
    pub empty_state_fg: String,

    /// State badge of open items.
    pub open_fg: String,
    /// State badge of closed items.
    pub closed_fg: String,
    /// Label names in the list and detail views.
    pub label_fg: String,

    /// Added lines in a diff.
    pub diff_add: String,
    /// Removed lines in a diff.
    pub diff_remove: String,
    /// Hunk headers in a diff.
    pub diff_hunk: String,

    /// Error notices.
    pub notice_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Supported names: `catppuccin-mocha`, `catppuccin-latte`,
    /// `catppuccin-frappe`, `catppuccin-macchiato`.
    ///
    /// # Returns
    ///
    /// - `Some(Theme)` if the theme name is recognized
    /// - `None` if the theme name is unknown
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDeckError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| IssueDeckError::Theme(format!("Failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| IssueDeckError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Resolves the configured theme: `theme_file` wins over `theme_name`,
    /// and anything that fails to load falls back to the default.
    #[must_use]
    pub fn resolve(theme_name: Option<&str>, theme_file: Option<&str>) -> Self {
        if let Some(file) = theme_file {
            match Self::from_file(file) {
                Ok(theme) => return theme,
                Err(e) => tracing::warn!(theme_file = %file, error = %e, "failed to load theme from file, using default"),
            }
        }
        if let Some(name) = theme_name {
            match Self::from_name(name) {
                Some(theme) => return theme,
                None => tracing::warn!(theme_name = %name, "unknown theme, using default"),
            }
        }
        Self::default()
    }

    /// Converts a hex color to RGB tuple.
    ///
    /// Returns `(255, 255, 255)` (white) on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// Generates an ANSI 24-bit foreground color escape sequence.
    ///
    /// # Example
    ///
    /// ```rust
    /// use issuedeck::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff0080"), "\u{1b}[38;2;255;0;128m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// Generates an ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    /// Returns the ANSI bold escape sequence (`\x1b[1m`).
    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// Returns the ANSI dim escape sequence (`\x1b[2m`).
    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Returns the ANSI reset escape sequence (`\x1b[0m`).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    /// Plain palette used if the bundled default somehow fails to parse.
    fn fallback() -> Self {
        let white = "#ffffff".to_string();
        let black = "#000000".to_string();
        Self {
            name: "fallback".to_string(),
            colors: ThemeColors {
                header_fg: white.clone(),
                header_bg: None,
                selection_fg: black,
                selection_bg: white.clone(),
                text_normal: white.clone(),
                text_dim: "#808080".to_string(),
                border: "#808080".to_string(),
                search_bar_border: white.clone(),
                match_highlight_fg: "#ffff00".to_string(),
                match_highlight_bg: "#303030".to_string(),
                empty_state_fg: white,
                open_fg: "#00ff00".to_string(),
                closed_fg: "#ff0000".to_string(),
                label_fg: "#ffff00".to_string(),
                diff_add: "#00ff00".to_string(),
                diff_remove: "#ff0000".to_string(),
                diff_hunk: "#00ffff".to_string(),
                notice_fg: "#ff0000".to_string(),
            },
        }
    }
}

impl Default for Theme {
    /// Returns the default theme (Catppuccin Mocha).
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn every_builtin_theme_parses() {
        for name in [
            "catppuccin-mocha",
            "catppuccin-latte",
            "catppuccin-frappe",
            "catppuccin-macchiato",
        ] {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} should parse"));
            assert_eq!(theme.name, name);
        }
        assert_eq!(Theme::default().name, DEFAULT_THEME);
    }

    #[test]
    fn invalid_hex_renders_white() {
        assert_eq!(Theme::fg("nope"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::bg("#00ff00"), "\u{1b}[48;2;0;255;0m");
    }

    #[test]
    fn theme_file_wins_over_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut custom = Theme::fallback();
        custom.name = "custom".into();
        write!(file, "{}", toml::to_string(&custom).unwrap()).unwrap();

        let path = file.path().to_string_lossy().to_string();
        let theme = Theme::resolve(Some("catppuccin-latte"), Some(&path));
        assert_eq!(theme.name, "custom");
    }

    #[test]
    fn broken_inputs_fall_back_to_default() {
        let theme = Theme::resolve(Some("solarized"), Some("/nonexistent/theme.toml"));
        assert_eq!(theme, Theme::default());
        assert!(matches!(Theme::from_file("/nonexistent/theme.toml"), Err(IssueDeckError::Theme(_))));
    }
}
