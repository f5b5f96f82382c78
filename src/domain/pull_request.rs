//! Pull request snapshots and their issue twins.

use super::issue::{Issue, IssueState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request as listed by the remote service.
///
/// The textual body, labels, assignee and comments live on the issue with the
/// same number; see [`PullRequestWithIssue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub author: String,
    /// `None` until the service has computed mergeability.
    pub mergeable: Option<bool>,
    pub merged: bool,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    pub head_ref: String,
    pub base_ref: String,
    pub commits: Option<u32>,
    pub additions: Option<u32>,
    pub deletions: Option<u32>,
}

impl PullRequest {
    /// Creates an open, unmerged pull request from `feature` into `main`.
    #[must_use]
    pub fn new(number: u64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            state: IssueState::Open,
            author: author.into(),
            mergeable: None,
            merged: false,
            created_at: Utc::now(),
            html_url: String::new(),
            head_ref: "feature".to_string(),
            base_ref: "main".to_string(),
            commits: None,
            additions: None,
            deletions: None,
        }
    }
}

/// A pull request joined with its issue twin at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestWithIssue {
    pub pr: PullRequest,
    pub issue: Issue,
}

impl PullRequestWithIssue {
    #[must_use]
    pub const fn new(pr: PullRequest, issue: Issue) -> Self {
        Self { pr, issue }
    }

    #[must_use]
    pub const fn number(&self) -> u64 {
        self.pr.number
    }

    /// Swaps in a newer snapshot of the issue twin.
    ///
    /// The title is shared between a pull request and its twin, so an edited
    /// twin title becomes the pull request's title too.
    pub fn replace_issue(&mut self, issue: Issue) {
        self.pr.title.clone_from(&issue.title);
        self.issue = issue;
    }

    /// Human-readable mergeability line shown in the detail view.
    #[must_use]
    pub const fn merge_status(&self) -> &'static str {
        if self.pr.merged {
            return "Merged";
        }
        match self.pr.mergeable {
            Some(true) => "Can be automatically merged",
            Some(false) => "Can't be automatically merged",
            None => "Mergeability unknown",
        }
    }
}
