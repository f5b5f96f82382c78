//! Infrastructure layer for filesystem, process and environment interactions.
//!
//! # Modules
//!
//! - [`paths`]: Config and data directories
//! - [`git`]: Repository discovery from git remotes
//! - [`browser`]: Opening URLs in the default browser

pub mod browser;
pub mod git;
pub mod paths;

pub use browser::open_url;
pub use git::{discover_repository, parse_repository_argument, DiscoveryError};
pub use paths::{config_dir, config_file, data_dir};
