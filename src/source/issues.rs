use super::{lock, Source};
use crate::domain::error::Result;
use crate::domain::{Issue, IssueState};
use crate::remote::RemoteService;
use std::sync::{Arc, Mutex};

/// Cached accessor over the repository's issues.
///
/// The open and closed partitions each have their own bootstrap flag. The
/// flag's lock is held for the whole fetch, so concurrent callers of the same
/// partition wait for the first one instead of fetching twice.
pub struct IssueSource {
    remote: Arc<dyn RemoteService>,
    cache: Mutex<Vec<Issue>>,
    open_bootstrapped: Mutex<bool>,
    closed_bootstrapped: Mutex<bool>,
}

impl IssueSource {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self {
            remote,
            cache: Mutex::new(Vec::new()),
            open_bootstrapped: Mutex::new(false),
            closed_bootstrapped: Mutex::new(false),
        }
    }

    /// Replaces the cached snapshot of `issue`, or appends it if unknown.
    ///
    /// Used after a mutation so the cache agrees with the server without
    /// re-fetching the partition.
    pub fn update_issue(&self, issue: Issue) {
        let mut cache = lock(&self.cache);
        match cache.iter_mut().find(|cached| cached.number == issue.number) {
            Some(cached) => *cached = issue,
            None => cache.push(issue),
        }
    }

    /// Cached snapshot of issue `number`, if any partition holding it was fetched.
    #[must_use]
    pub fn get(&self, number: u64) -> Option<Issue> {
        lock(&self.cache)
            .iter()
            .find(|issue| issue.number == number)
            .cloned()
    }

    /// Returns `true` once the partition for `state` has been fetched.
    #[must_use]
    pub fn is_bootstrapped(&self, state: IssueState) -> bool {
        *lock(self.flag(state))
    }

    fn flag(&self, state: IssueState) -> &Mutex<bool> {
        match state {
            IssueState::Open => &self.open_bootstrapped,
            IssueState::Closed => &self.closed_bootstrapped,
        }
    }

    /// Fetches the partition for `state` unless it is already cached.
    ///
    /// # Errors
    ///
    /// Propagates the remote error. Nothing is cached on failure.
    pub fn bootstrap(&self, state: IssueState) -> Result<()> {
        let mut bootstrapped = lock(self.flag(state));
        if *bootstrapped {
            return Ok(());
        }

        let _span = tracing::debug_span!("bootstrap_issues", state = state.as_str()).entered();
        let fetched = self.remote.list_issues(state)?;
        let count = fetched.len();

        let mut cache = lock(&self.cache);
        for issue in fetched {
            if !cache.iter().any(|cached| cached.number == issue.number) {
                cache.push(issue);
            }
        }
        *bootstrapped = true;

        tracing::info!(state = state.as_str(), count, "issue partition bootstrapped");
        Ok(())
    }

    fn replay(&self, state: IssueState) -> Result<Vec<Issue>> {
        self.bootstrap(state)?;
        Ok(lock(&self.cache)
            .iter()
            .filter(|issue| issue.state == state)
            .cloned()
            .collect())
    }
}

impl Source for IssueSource {
    type Item = Issue;

    fn iter_open(&self) -> Result<Vec<Issue>> {
        self.replay(IssueState::Open)
    }

    fn iter_closed(&self) -> Result<Vec<Issue>> {
        self.replay(IssueState::Closed)
    }
}

impl std::fmt::Debug for IssueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = lock(&self.cache).len();
        f.debug_struct("IssueSource")
            .field("cached", &cached)
            .field("open_bootstrapped", &self.is_bootstrapped(IssueState::Open))
            .field("closed_bootstrapped", &self.is_bootstrapped(IssueState::Closed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::InMemoryRemote;

    fn remote() -> Arc<InMemoryRemote> {
        let remote = InMemoryRemote::new("acme", "widgets", "alice");
        remote.add_issue(Issue::new(1, "Open one", "bob"));
        remote.add_issue(Issue::new(2, "Closed one", "bob").with_state(IssueState::Closed));
        remote.add_issue(Issue::new(3, "Open two", "carol"));
        Arc::new(remote)
    }

    #[test]
    fn each_partition_is_fetched_once() {
        let remote = remote();
        let source = IssueSource::new(remote.clone());

        let first: Vec<u64> = source.iter_open().unwrap().iter().map(|i| i.number).collect();
        let second: Vec<u64> = source.iter_open().unwrap().iter().map(|i| i.number).collect();
        assert_eq!(first, vec![1, 3]);
        assert_eq!(first, second);
        assert_eq!(remote.calls("list_issues"), 1);

        source.iter_closed().unwrap();
        source.iter_all().unwrap();
        assert_eq!(remote.calls("list_issues"), 2);
    }

    #[test]
    fn failed_fetch_caches_nothing_and_retries() {
        let remote = remote();
        let source = IssueSource::new(remote.clone());

        remote.fail("list_issues");
        assert!(source.iter_open().is_err());
        assert!(!source.is_bootstrapped(IssueState::Open));
        assert!(source.get(1).is_none());

        remote.recover("list_issues");
        assert_eq!(source.iter_open().unwrap().len(), 2);
        assert_eq!(remote.calls("list_issues"), 2);
    }

    #[test]
    fn debug_reports_cache_and_flags() {
        let source = IssueSource::new(remote());
        source.iter_open().unwrap();

        let debug = format!("{source:?}");

        assert!(debug.contains("cached: 2"));
        assert!(debug.contains("open_bootstrapped: true"));
        assert!(debug.contains("closed_bootstrapped: false"));
    }

    #[test]
    fn updated_issue_moves_between_partitions_without_refetch() {
        let remote = remote();
        let source = IssueSource::new(remote.clone());
        source.iter_all().unwrap();

        let closed = Issue::new(1, "Open one", "bob").with_state(IssueState::Closed);
        source.update_issue(closed);

        let open: Vec<u64> = source.iter_open().unwrap().iter().map(|i| i.number).collect();
        let closed: Vec<u64> = source.iter_closed().unwrap().iter().map(|i| i.number).collect();
        assert_eq!(open, vec![3]);
        assert_eq!(closed, vec![1, 2]);
        assert_eq!(remote.calls("list_issues"), 2);
    }
}
