//! Remote repository service layer.
//!
//! # Modules
//!
//! - [`backend`]: The [`RemoteService`] trait
//! - [`gh`]: Implementation driving the GitHub CLI
//! - [`memory`]: Offline implementation used by tests
//! - [`models`]: JSON wire records

pub mod backend;
pub mod gh;
pub mod memory;
pub mod models;

pub use backend::{RemoteService, Repository};
pub use gh::{CommandRunner, GhCliClient, ProcessCommandRunner};
pub use memory::InMemoryRemote;
