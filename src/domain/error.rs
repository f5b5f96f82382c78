//! Error types for issuedeck.
//!
//! This module defines the centralized error type [`IssueDeckError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Empty editor input and edits by a user who is neither the author nor the
//! repository owner are not errors: the controller turns them into silent no-ops.

use thiserror::Error;

/// The main error type for issuedeck operations.
///
/// # Examples
///
/// ```
/// use issuedeck::IssueDeckError;
///
/// fn list() -> Result<(), IssueDeckError> {
///     Err(IssueDeckError::Remote("HTTP 502 from api.github.com".to_string()))
/// }
///
/// assert!(list().unwrap_err().is_remote());
/// ```
#[derive(Debug, Error)]
pub enum IssueDeckError {
    /// A call to the remote repository service failed.
    ///
    /// Covers network, authentication, rate-limit and timeout failures. The
    /// controller reports these as a notice and keeps the previous view.
    #[error("Remote service error: {0}")]
    Remote(String),

    /// No repository could be resolved, or the configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An event name that is not part of the bus registry was used.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// The external editor could not be launched.
    #[error("Editor error: {0}")]
    Editor(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A response payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),
}

impl IssueDeckError {
    /// Returns `true` for failures of the remote repository service.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// A specialized `Result` type for issuedeck operations.
pub type Result<T> = std::result::Result<T, IssueDeckError>;
