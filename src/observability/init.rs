//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "issuedeck.log";

/// Initializes the tracing subscriber with rotating file output.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable (highest priority)
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// # File Location
///
/// `$XDG_DATA_HOME/issuedeck/issuedeck.log` (see
/// [`data_dir`](crate::infrastructure::paths::data_dir)).
///
/// # Initialization Behavior
///
/// Logging is best-effort: if the data directory cannot be created, or a
/// global subscriber is already installed, tracing stays uninitialized and
/// `None` is returned. The application never fails because of logging.
///
/// # Returns
///
/// The log file path when the subscriber was installed.
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = crate::infrastructure::paths::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return None;
    }

    let log_file = data_dir.join(LOG_FILE_NAME);
    let layer = fmt::layer()
        .with_writer(FileWriter::new(log_file.clone()))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()
        .map(|()| log_file)
}
