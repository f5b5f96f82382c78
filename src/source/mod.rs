//! Lazily bootstrapped, cached accessors over the remote service.
//!
//! Each [`Source`] partition (open, closed) is fetched at most once per
//! session. The first call into a partition performs the fetch; later calls
//! replay the cache filtered by state. A failed fetch caches nothing and
//! leaves the partition un-bootstrapped so the next call tries again.
//!
//! # Modules
//!
//! - [`issues`]: [`IssueSource`] over plain issues
//! - [`pulls`]: [`PullRequestSource`] joining pull requests with their issue twins
//! - [`bootstrap`]: Optional concurrent warm-up of every partition

pub mod bootstrap;
pub mod issues;
pub mod pulls;

pub use bootstrap::bootstrap_all;
pub use issues::IssueSource;
pub use pulls::PullRequestSource;

use crate::domain::error::Result;

/// A category of remote items split into open and closed partitions.
pub trait Source {
    type Item;

    /// Items in the open partition, bootstrapping it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the remote error of a failed bootstrap.
    fn iter_open(&self) -> Result<Vec<Self::Item>>;

    /// Items in the closed partition, bootstrapping it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the remote error of a failed bootstrap.
    fn iter_closed(&self) -> Result<Vec<Self::Item>>;

    /// Open items followed by closed items.
    ///
    /// # Errors
    ///
    /// Propagates the remote error of a failed bootstrap.
    fn iter_all(&self) -> Result<Vec<Self::Item>> {
        let mut items = self.iter_open()?;
        items.extend(self.iter_closed()?);
        Ok(items)
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
