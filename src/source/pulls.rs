use super::{lock, Source};
use crate::domain::error::Result;
use crate::domain::{Issue, IssueState, PullRequestWithIssue};
use crate::remote::RemoteService;
use std::sync::{Arc, Mutex};

/// Cached accessor over the repository's pull requests.
///
/// Each listed pull request is re-fetched for its merge and size metadata and
/// joined with its issue twin, which costs one `get_pull` and one `get_issue`
/// call per pull request. Both partitions come from the same single fetch.
pub struct PullRequestSource {
    remote: Arc<dyn RemoteService>,
    cache: Mutex<Option<Vec<PullRequestWithIssue>>>,
}

impl PullRequestSource {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self {
            remote,
            cache: Mutex::new(None),
        }
    }

    /// Every cached pull request, bootstrapping on first use.
    ///
    /// # Errors
    ///
    /// Propagates the remote error of a failed bootstrap.
    pub fn iter(&self) -> Result<Vec<PullRequestWithIssue>> {
        self.replay(|_| true)
    }

    /// Fetches the pull requests and their twins unless already cached.
    ///
    /// # Errors
    ///
    /// Propagates the first remote error. Pull requests joined before the
    /// failure are discarded.
    pub fn bootstrap(&self) -> Result<()> {
        let mut cache = lock(&self.cache);
        if cache.is_some() {
            return Ok(());
        }

        let _span = tracing::debug_span!("bootstrap_pulls").entered();
        let pulls = self.remote.list_pulls()?;
        let joined = pulls
            .into_iter()
            .map(|listed| {
                let pr = self.remote.get_pull(listed.number)?;
                let issue = self.remote.get_issue(listed.number)?;
                Ok(PullRequestWithIssue::new(pr, issue))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(count = joined.len(), "pull requests bootstrapped");
        *cache = Some(joined);
        Ok(())
    }

    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        lock(&self.cache).is_some()
    }

    /// Replaces the cached issue twin of the pull request sharing its number.
    ///
    /// Returns `false` when no cached pull request has that number. Never
    /// bootstraps.
    pub fn update_issue(&self, issue: &Issue) -> bool {
        let mut cache = lock(&self.cache);
        let mut replaced = false;
        for pull in cache.iter_mut().flatten().filter(|pull| pull.number() == issue.number) {
            pull.replace_issue(issue.clone());
            replaced = true;
        }
        replaced
    }

    fn replay(&self, keep: impl Fn(&PullRequestWithIssue) -> bool) -> Result<Vec<PullRequestWithIssue>> {
        self.bootstrap()?;
        Ok(lock(&self.cache)
            .iter()
            .flatten()
            .filter(|pull| keep(pull))
            .cloned()
            .collect())
    }
}

impl Source for PullRequestSource {
    type Item = PullRequestWithIssue;

    fn iter_open(&self) -> Result<Vec<PullRequestWithIssue>> {
        self.replay(|pull| pull.pr.state == IssueState::Open)
    }

    fn iter_closed(&self) -> Result<Vec<PullRequestWithIssue>> {
        self.replay(|pull| pull.pr.state == IssueState::Closed)
    }
}

impl std::fmt::Debug for PullRequestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = lock(&self.cache).as_ref().map(Vec::len);
        f.debug_struct("PullRequestSource")
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Label, PullRequest};
    use crate::remote::InMemoryRemote;

    fn remote() -> Arc<InMemoryRemote> {
        let remote = InMemoryRemote::new("acme", "widgets", "alice");
        remote.add_pull_request(
            PullRequest::new(10, "Add cache", "bob"),
            Issue::new(10, "Add cache", "bob").with_labels(vec![Label::new("perf", "00ff00")]),
        );
        remote.add_pull_request(
            PullRequest::new(11, "Fix typo", "carol"),
            Issue::new(11, "Fix typo", "carol").with_body("Trivial"),
        );
        Arc::new(remote)
    }

    #[test]
    fn pulls_are_joined_with_their_issue_twins() {
        let remote = remote();
        let source = PullRequestSource::new(remote.clone());

        let pulls = source.iter().unwrap();
        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].issue.labels[0].name, "perf");
        assert_eq!(pulls[1].issue.body, "Trivial");

        source.iter_open().unwrap();
        assert_eq!(remote.calls("list_pulls"), 1);
        assert_eq!(remote.calls("get_issue"), 2);
        assert_eq!(remote.calls("get_pull"), 2);
    }

    #[test]
    fn joined_pulls_carry_single_pull_metadata() {
        let remote = InMemoryRemote::new("acme", "widgets", "alice");
        remote.add_pull_request(
            PullRequest {
                mergeable: Some(true),
                commits: Some(3),
                additions: Some(40),
                deletions: Some(7),
                ..PullRequest::new(12, "Trim output", "bob")
            },
            Issue::new(12, "Trim output", "bob"),
        );
        let remote = Arc::new(remote);
        assert_eq!(remote.list_pulls().unwrap()[0].mergeable, None);

        let source = PullRequestSource::new(remote);
        let pulls = source.iter().unwrap();

        assert_eq!(pulls[0].pr.mergeable, Some(true));
        assert_eq!(pulls[0].merge_status(), "Can be automatically merged");
        assert_eq!((pulls[0].pr.additions, pulls[0].pr.deletions), (Some(40), Some(7)));
        assert_eq!(pulls[0].pr.commits, Some(3));
    }

    #[test]
    fn failed_twin_lookup_discards_the_whole_fetch() {
        let remote = remote();
        remote.fail_issue_lookup(11);
        let source = PullRequestSource::new(remote.clone());

        assert!(source.iter().is_err());
        assert!(!source.is_bootstrapped());
    }
}
