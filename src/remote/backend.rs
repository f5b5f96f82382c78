//! Remote repository service abstraction.
//!
//! This module defines the [`RemoteService`] trait that abstracts over the
//! hosting service's issue tracker. Sources, filters and the controller only
//! talk to this trait, so the `gh` client and the in-memory service are
//! interchangeable.
//!
//! Every call is synchronous and blocks its caller until the service answers.
//! Any failure is reported as [`IssueDeckError::Remote`](crate::IssueDeckError::Remote).

use crate::domain::error::Result;
use crate::domain::{Comment, Issue, IssueState, Label, PullRequest};

/// Metadata of the repository being browsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub has_issues: bool,
    /// `owner/name` of the repository this one was forked from.
    pub parent: Option<String>,
    pub html_url: String,
}

impl Repository {
    /// A github.com repository with issues enabled and no parent.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            html_url: format!("https://github.com/{owner}/{name}"),
            owner,
            name,
            has_issues: true,
            parent: None,
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Operations the core needs from the hosting service.
///
/// # Implementations
///
/// - [`GhCliClient`](crate::remote::GhCliClient): shells out to `gh api`
/// - [`InMemoryRemote`](crate::remote::InMemoryRemote): offline service used in tests
pub trait RemoteService: Send + Sync {
    /// Metadata of the configured repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn repository(&self) -> Result<Repository>;

    /// Login of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn current_user(&self) -> Result<String>;

    /// Lists issues in the given state. Pull requests are never included.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn list_issues(&self, state: IssueState) -> Result<Vec<Issue>>;

    /// Lists open pull requests.
    ///
    /// List entries carry no merge or size metadata; see [`get_pull`](Self::get_pull).
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn list_pulls(&self) -> Result<Vec<PullRequest>>;

    /// Fetches one issue by number. For a pull request this is its issue twin.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails or no such issue exists.
    fn get_issue(&self, number: u64) -> Result<Issue>;

    /// Fetches one pull request by number, including mergeability, commit
    /// count and line statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails or no such pull request exists.
    fn get_pull(&self, number: u64) -> Result<PullRequest>;

    /// Opens a new issue and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn create_issue(&self, title: &str, body: &str) -> Result<Issue>;

    /// Closes an issue and returns the updated snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn close(&self, issue: &Issue) -> Result<Issue>;

    /// Reopens an issue and returns the updated snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn reopen(&self, issue: &Issue) -> Result<Issue>;

    /// Posts a comment on an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn create_comment(&self, issue: &Issue, text: &str) -> Result<Comment>;

    /// Replaces an issue's title and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn edit_issue(&self, issue: &Issue, title: &str, body: &str) -> Result<Issue>;

    /// Replaces a comment's body.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn edit_comment(&self, comment: &Comment, text: &str) -> Result<Comment>;

    /// Lists the repository's labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn list_labels(&self) -> Result<Vec<Label>>;

    /// Unified diff of a pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn diff(&self, pr: &PullRequest) -> Result<String>;

    /// Lists the comments on an issue, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn list_comments(&self, issue: &Issue) -> Result<Vec<Comment>>;
}
