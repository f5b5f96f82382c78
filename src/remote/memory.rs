//! Offline [`RemoteService`] holding everything in memory.
//!
//! Used by the test suites and handy for demos. Every operation is counted so
//! tests can assert how often the network would have been hit, and any
//! operation can be switched to fail with a remote error.

use super::backend::{RemoteService, Repository};
use crate::domain::error::{IssueDeckError, Result};
use crate::domain::{Comment, Issue, IssueState, Label, PullRequest};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    issues: Vec<Issue>,
    pulls: Vec<PullRequest>,
    comments: Vec<Comment>,
    labels: Vec<Label>,
    diffs: HashMap<u64, String>,
    calls: HashMap<&'static str, usize>,
    failing: HashSet<&'static str>,
    failing_issues: HashSet<u64>,
    next_comment_id: u64,
}

/// In-memory issue tracker for one repository.
///
/// # Example
///
/// ```
/// use issuedeck::domain::{Issue, IssueState};
/// use issuedeck::remote::{InMemoryRemote, RemoteService};
///
/// let remote = InMemoryRemote::new("acme", "widgets", "alice");
/// remote.add_issue(Issue::new(1, "Crash on start", "bob"));
///
/// let open = remote.list_issues(IssueState::Open)?;
/// assert_eq!(open.len(), 1);
/// assert_eq!(remote.calls("list_issues"), 1);
/// # Ok::<(), issuedeck::IssueDeckError>(())
/// ```
#[derive(Debug)]
pub struct InMemoryRemote {
    repository: Repository,
    user: String,
    inner: Mutex<Inner>,
}

impl InMemoryRemote {
    #[must_use]
    pub fn new(owner: &str, name: &str, user: &str) -> Self {
        Self {
            repository: Repository {
                owner: owner.to_string(),
                name: name.to_string(),
                has_issues: true,
                parent: None,
                html_url: format!("https://github.com/{owner}/{name}"),
            },
            user: user.to_string(),
            inner: Mutex::new(Inner {
                next_comment_id: 1,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Records a call and fails it if the operation was switched off.
    fn enter(&self, operation: &'static str) -> Result<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        *inner.calls.entry(operation).or_insert(0) += 1;
        if inner.failing.contains(operation) {
            return Err(IssueDeckError::Remote(format!("{operation} failed")));
        }
        Ok(inner)
    }

    pub fn add_issue(&self, mut issue: Issue) {
        if issue.html_url.is_empty() {
            issue.html_url = format!("{}/issues/{}", self.repository.html_url, issue.number);
        }
        let mut inner = self.lock();
        inner.issues.retain(|existing| existing.number != issue.number);
        inner.issues.push(issue);
    }

    /// Adds a pull request together with its issue twin.
    pub fn add_pull_request(&self, mut pr: PullRequest, issue: Issue) {
        if pr.html_url.is_empty() {
            pr.html_url = format!("{}/pull/{}", self.repository.html_url, pr.number);
        }
        self.add_issue(issue);
        let mut inner = self.lock();
        inner.pulls.retain(|existing| existing.number != pr.number);
        inner.pulls.push(pr);
    }

    pub fn add_comment(&self, issue_number: u64, author: &str, body: &str) -> Comment {
        let mut inner = self.lock();
        let comment = Self::new_comment(&mut inner, &self.repository, issue_number, author, body);
        inner.comments.push(comment.clone());
        comment
    }

    pub fn add_label(&self, label: Label) {
        self.lock().labels.push(label);
    }

    pub fn set_diff(&self, number: u64, diff: &str) {
        self.lock().diffs.insert(number, diff.to_string());
    }

    /// Makes every subsequent call of `operation` fail with a remote error.
    pub fn fail(&self, operation: &'static str) {
        self.lock().failing.insert(operation);
    }

    /// Undoes [`fail`](Self::fail).
    pub fn recover(&self, operation: &'static str) {
        self.lock().failing.remove(operation);
    }

    /// Makes `get_issue(number)` fail while other lookups succeed.
    pub fn fail_issue_lookup(&self, number: u64) {
        self.lock().failing_issues.insert(number);
    }

    /// Number of times `operation` has been called.
    #[must_use]
    pub fn calls(&self, operation: &str) -> usize {
        self.lock().calls.get(operation).copied().unwrap_or(0)
    }

    /// Total number of recorded calls across all operations.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Current server-side snapshot of an issue.
    #[must_use]
    pub fn issue(&self, number: u64) -> Option<Issue> {
        self.lock()
            .issues
            .iter()
            .find(|issue| issue.number == number)
            .cloned()
    }

    /// Current server-side comments of an issue.
    #[must_use]
    pub fn comments_of(&self, number: u64) -> Vec<Comment> {
        self.lock()
            .comments
            .iter()
            .filter(|comment| comment.issue_number == number)
            .cloned()
            .collect()
    }

    fn new_comment(
        inner: &mut Inner,
        repository: &Repository,
        issue_number: u64,
        author: &str,
        body: &str,
    ) -> Comment {
        let id = inner.next_comment_id;
        inner.next_comment_id += 1;
        if let Some(issue) = inner.issues.iter_mut().find(|i| i.number == issue_number) {
            issue.comments += 1;
        }
        Comment {
            id,
            author: author.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
            html_url: format!(
                "{}/issues/{issue_number}#issuecomment-{id}",
                repository.html_url
            ),
            issue_number,
        }
    }

    fn update_issue(inner: &mut Inner, number: u64, apply: impl FnOnce(&mut Issue)) -> Result<Issue> {
        let issue = inner
            .issues
            .iter_mut()
            .find(|issue| issue.number == number)
            .ok_or_else(|| IssueDeckError::Remote(format!("HTTP 404: issue #{number} not found")))?;
        apply(issue);
        Ok(issue.clone())
    }

    fn next_number(inner: &Inner) -> u64 {
        let issues = inner.issues.iter().map(|issue| issue.number);
        let pulls = inner.pulls.iter().map(|pr| pr.number);
        issues.chain(pulls).max().unwrap_or(0) + 1
    }
}

impl RemoteService for InMemoryRemote {
    fn repository(&self) -> Result<Repository> {
        let _inner = self.enter("repository")?;
        Ok(self.repository.clone())
    }

    fn current_user(&self) -> Result<String> {
        let _inner = self.enter("current_user")?;
        Ok(self.user.clone())
    }

    fn list_issues(&self, state: IssueState) -> Result<Vec<Issue>> {
        let inner = self.enter("list_issues")?;
        let pr_numbers: HashSet<u64> = inner.pulls.iter().map(|pr| pr.number).collect();
        Ok(inner
            .issues
            .iter()
            .filter(|issue| issue.state == state && !pr_numbers.contains(&issue.number))
            .cloned()
            .collect())
    }

    fn list_pulls(&self) -> Result<Vec<PullRequest>> {
        let inner = self.enter("list_pulls")?;
        Ok(inner
            .pulls
            .iter()
            .filter(|pr| pr.state == IssueState::Open)
            .map(|pr| PullRequest {
                mergeable: None,
                commits: None,
                additions: None,
                deletions: None,
                ..pr.clone()
            })
            .collect())
    }

    fn get_pull(&self, number: u64) -> Result<PullRequest> {
        let inner = self.enter("get_pull")?;
        inner
            .pulls
            .iter()
            .find(|pr| pr.number == number)
            .cloned()
            .ok_or_else(|| IssueDeckError::Remote(format!("HTTP 404: pull request #{number} not found")))
    }

    fn get_issue(&self, number: u64) -> Result<Issue> {
        let inner = self.enter("get_issue")?;
        if inner.failing_issues.contains(&number) {
            return Err(IssueDeckError::Remote(format!("get_issue #{number} failed")));
        }
        inner
            .issues
            .iter()
            .find(|issue| issue.number == number)
            .cloned()
            .ok_or_else(|| IssueDeckError::Remote(format!("HTTP 404: issue #{number} not found")))
    }

    fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        let mut inner = self.enter("create_issue")?;
        let number = Self::next_number(&inner);
        let mut issue = Issue::new(number, title, self.user.clone()).with_body(body);
        issue.html_url = format!("{}/issues/{number}", self.repository.html_url);
        inner.issues.push(issue.clone());
        Ok(issue)
    }

    fn close(&self, issue: &Issue) -> Result<Issue> {
        let mut inner = self.enter("close")?;
        Self::update_issue(&mut inner, issue.number, |issue| {
            issue.state = IssueState::Closed;
        })
    }

    fn reopen(&self, issue: &Issue) -> Result<Issue> {
        let mut inner = self.enter("reopen")?;
        Self::update_issue(&mut inner, issue.number, |issue| {
            issue.state = IssueState::Open;
        })
    }

    fn create_comment(&self, issue: &Issue, text: &str) -> Result<Comment> {
        let mut inner = self.enter("create_comment")?;
        let comment = Self::new_comment(&mut inner, &self.repository, issue.number, &self.user, text);
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    fn edit_issue(&self, issue: &Issue, title: &str, body: &str) -> Result<Issue> {
        let mut inner = self.enter("edit_issue")?;
        Self::update_issue(&mut inner, issue.number, |issue| {
            issue.title = title.to_string();
            issue.body = body.to_string();
        })
    }

    fn edit_comment(&self, comment: &Comment, text: &str) -> Result<Comment> {
        let mut inner = self.enter("edit_comment")?;
        let stored = inner
            .comments
            .iter_mut()
            .find(|existing| existing.id == comment.id)
            .ok_or_else(|| IssueDeckError::Remote(format!("HTTP 404: comment {} not found", comment.id)))?;
        stored.body = text.to_string();
        Ok(stored.clone())
    }

    fn list_labels(&self) -> Result<Vec<Label>> {
        let inner = self.enter("list_labels")?;
        Ok(inner.labels.clone())
    }

    fn diff(&self, pr: &PullRequest) -> Result<String> {
        let inner = self.enter("diff")?;
        Ok(inner.diffs.get(&pr.number).cloned().unwrap_or_default())
    }

    fn list_comments(&self, issue: &Issue) -> Result<Vec<Comment>> {
        let inner = self.enter("list_comments")?;
        Ok(inner
            .comments
            .iter()
            .filter(|comment| comment.issue_number == issue.number)
            .cloned()
            .collect())
    }
}
