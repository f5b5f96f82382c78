//! Core domain types for issuedeck.
//!
//! This module contains the fundamental snapshots the rest of the crate passes
//! around and the error types used throughout.
//!
//! # Modules
//!
//! - [`error`]: Error types and result aliases
//! - [`issue`]: Issue, comment and label snapshots
//! - [`pull_request`]: Pull requests joined with their issue twin
//! - [`item`]: Tagged unions over list rows and focused entries
//! - [`time`]: Relative timestamp formatting

pub mod error;
pub mod issue;
pub mod item;
pub mod pull_request;
pub mod time;

pub use error::{IssueDeckError, Result};
pub use issue::{Comment, Issue, IssueState, Label};
pub use item::{Focused, Item, ItemKey, ItemKind};
pub use pull_request::{PullRequest, PullRequestWithIssue};
pub use time::{time_since, time_since_now};
