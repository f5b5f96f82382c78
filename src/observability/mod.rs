//! File-based structured logging.
//!
//! The terminal belongs to the UI, so `tracing` output is written to a
//! rotating log file instead of stderr:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → issuedeck.log
//! ```
//!
//! # Features
//!
//! - **File Output**: `~/.local/share/issuedeck/issuedeck.log`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the config file
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust,no_run
//! use issuedeck::observability::init_tracing;
//! use issuedeck::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("started");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
