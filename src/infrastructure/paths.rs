//! Platform directories for configuration and logs.
//!
//! Locations follow the XDG base directory layout on Linux and the platform
//! conventions elsewhere, as resolved by the `dirs` crate. When no home
//! directory can be determined the current directory is used.

use std::path::PathBuf;

const APP_DIR: &str = "issuedeck";

/// Directory holding `config.toml`.
///
/// # Examples
///
/// ```
/// use issuedeck::infrastructure::paths::config_dir;
///
/// assert!(config_dir().ends_with("issuedeck"));
/// ```
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default location of the config file: `$XDG_CONFIG_HOME/issuedeck/config.toml`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Directory holding the log files.
///
/// This typically resolves to `~/.local/share/issuedeck`.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
