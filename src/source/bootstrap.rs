//! Concurrent warm-up of every source partition before the first render.

use super::{IssueSource, PullRequestSource};
use crate::domain::error::{IssueDeckError, Result};
use crate::domain::IssueState;
use std::thread;

/// Fetches open issues, closed issues and pull requests on three scoped
/// workers and joins them all before returning.
///
/// Each partition has a single writer, and a partition already bootstrapped
/// is skipped. Failures are logged and leave the partition empty, so the
/// lazy path retries it on first use.
///
/// # Returns
///
/// The number of partitions that failed.
pub fn bootstrap_all(issues: &IssueSource, pulls: &PullRequestSource) -> usize {
    let _span = tracing::info_span!("bootstrap_all").entered();

    let results: Vec<(&'static str, Result<()>)> = thread::scope(|scope| {
        let open = scope.spawn(|| issues.bootstrap(IssueState::Open));
        let closed = scope.spawn(|| issues.bootstrap(IssueState::Closed));
        let prs = scope.spawn(|| pulls.bootstrap());

        [("open_issues", open), ("closed_issues", closed), ("pull_requests", prs)]
            .into_iter()
            .map(|(partition, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(IssueDeckError::Remote(format!("{partition} worker panicked")))
                });
                (partition, result)
            })
            .collect()
    });

    let mut failed = 0;
    for (partition, result) in results {
        if let Err(e) = result {
            failed += 1;
            tracing::error!(partition, error = %e, "bootstrap failed");
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Issue, PullRequest};
    use crate::remote::InMemoryRemote;
    use crate::source::Source;
    use std::sync::Arc;

    #[test]
    fn warm_up_fetches_each_partition_exactly_once() {
        let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
        remote.add_issue(Issue::new(1, "Open", "bob"));
        remote.add_pull_request(PullRequest::new(2, "Change", "bob"), Issue::new(2, "Change", "bob"));

        let issues = IssueSource::new(remote.clone());
        let pulls = PullRequestSource::new(remote.clone());

        assert_eq!(bootstrap_all(&issues, &pulls), 0);
        assert_eq!(bootstrap_all(&issues, &pulls), 0);
        issues.iter_all().unwrap();
        pulls.iter().unwrap();

        assert_eq!(remote.calls("list_issues"), 2);
        assert_eq!(remote.calls("list_pulls"), 1);
        assert_eq!(remote.calls("get_issue"), 1);
    }

    #[test]
    fn failed_partition_is_retried_lazily() {
        let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
        remote.add_issue(Issue::new(1, "Open", "bob"));
        remote.fail("list_pulls");

        let issues = IssueSource::new(remote.clone());
        let pulls = PullRequestSource::new(remote.clone());

        assert_eq!(bootstrap_all(&issues, &pulls), 1);
        assert!(!pulls.is_bootstrapped());

        remote.recover("list_pulls");
        assert!(pulls.iter().unwrap().is_empty());
        assert_eq!(remote.calls("list_pulls"), 2);
    }
}
