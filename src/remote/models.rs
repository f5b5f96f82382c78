//! Wire records for the GitHub REST API.
//!
//! This module defines the raw JSON shapes returned by `gh api`. These types are
//! separate from domain models to keep the service's representation (nullable
//! bodies, nested user objects, optional merge fields) out of the core.

use crate::domain::{Comment, Issue, IssueState, Label, PullRequest};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelRecord {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl From<LabelRecord> for Label {
    fn from(record: LabelRecord) -> Self {
        Self::new(record.name, record.color)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneRecord {
    pub title: String,
}

/// An entry of `repos/{owner}/{repo}/issues`.
///
/// The issues endpoint also returns pull requests; those carry a
/// `pull_request` object and are dropped by [`IssueRecord::is_pull_request`].
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
    pub user: UserRecord,
    #[serde(default)]
    pub assignee: Option<UserRecord>,
    #[serde(default)]
    pub labels: Vec<LabelRecord>,
    #[serde(default)]
    pub comments: u32,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    #[serde(default)]
    pub milestone: Option<MilestoneRecord>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl IssueRecord {
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl From<IssueRecord> for Issue {
    fn from(record: IssueRecord) -> Self {
        Self {
            number: record.number,
            title: record.title,
            body: record.body.unwrap_or_default(),
            state: record.state,
            author: record.user.login,
            assignee: record.assignee.map(|user| user.login),
            labels: record.labels.into_iter().map(Label::from).collect(),
            comments: record.comments,
            created_at: record.created_at,
            html_url: record.html_url,
            milestone: record.milestone.map(|milestone| milestone.title),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRecord {
    #[serde(rename = "ref")]
    pub name: String,
}

/// An entry of `repos/{owner}/{repo}/pulls`.
///
/// Merge and size fields are only present on the single-PR endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub user: UserRecord,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    pub head: BranchRecord,
    pub base: BranchRecord,
    #[serde(default)]
    pub commits: Option<u32>,
    #[serde(default)]
    pub additions: Option<u32>,
    #[serde(default)]
    pub deletions: Option<u32>,
}

impl From<PullRequestRecord> for PullRequest {
    fn from(record: PullRequestRecord) -> Self {
        let merged = record.merged.unwrap_or(record.merged_at.is_some());
        Self {
            number: record.number,
            title: record.title,
            state: record.state,
            author: record.user.login,
            mergeable: record.mergeable,
            merged,
            created_at: record.created_at,
            html_url: record.html_url,
            head_ref: record.head.name,
            base_ref: record.base.name,
            commits: record.commits,
            additions: record.additions,
            deletions: record.deletions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRecord {
    pub id: u64,
    pub user: UserRecord,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

impl CommentRecord {
    #[must_use]
    pub fn into_comment(self, issue_number: u64) -> Comment {
        Comment {
            id: self.id,
            author: self.user.login,
            body: self.body.unwrap_or_default(),
            created_at: self.created_at,
            html_url: self.html_url,
            issue_number,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentRecord {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub owner: UserRecord,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub parent: Option<ParentRecord>,
    pub html_url: String,
}

impl From<RepositoryRecord> for super::Repository {
    fn from(record: RepositoryRecord) -> Self {
        Self {
            owner: record.owner.login,
            name: record.name,
            has_issues: record.has_issues,
            parent: record.parent.map(|parent| parent.full_name),
            html_url: record.html_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_record_maps_nullable_fields() {
        let json = r#"{
            "number": 7,
            "title": "Crash on start",
            "body": null,
            "state": "open",
            "user": {"login": "alice"},
            "assignee": {"login": "bob"},
            "labels": [{"name": "bug", "color": "d73a4a"}],
            "comments": 2,
            "created_at": "2024-03-01T10:00:00Z",
            "html_url": "https://github.com/acme/widgets/issues/7",
            "milestone": null
        }"#;

        let record: IssueRecord = serde_json::from_str(json).expect("parse");
        assert!(!record.is_pull_request());

        let issue = Issue::from(record);
        assert_eq!(issue.body, "");
        assert_eq!(issue.author, "alice");
        assert_eq!(issue.assignee.as_deref(), Some("bob"));
        assert_eq!(issue.labels, vec![Label::new("bug", "d73a4a")]);
        assert_eq!(issue.state, IssueState::Open);
    }

    #[test]
    fn issue_listing_marks_pull_requests() {
        let json = r#"{
            "number": 8, "title": "Add feature", "state": "open",
            "user": {"login": "alice"}, "created_at": "2024-03-01T10:00:00Z",
            "html_url": "https://github.com/acme/widgets/pull/8",
            "pull_request": {"url": "https://api.github.com/repos/acme/widgets/pulls/8"}
        }"#;

        let record: IssueRecord = serde_json::from_str(json).expect("parse");
        assert!(record.is_pull_request());
    }

    #[test]
    fn pull_request_merged_falls_back_to_merged_at() {
        let json = r#"{
            "number": 9, "title": "Refactor", "state": "closed",
            "user": {"login": "carol"}, "created_at": "2024-03-01T10:00:00Z",
            "merged_at": "2024-03-02T10:00:00Z",
            "html_url": "https://github.com/acme/widgets/pull/9",
            "head": {"ref": "refactor"}, "base": {"ref": "main"}
        }"#;

        let pr = PullRequest::from(serde_json::from_str::<PullRequestRecord>(json).expect("parse"));
        assert!(pr.merged);
        assert_eq!(pr.mergeable, None);
        assert_eq!(pr.head_ref, "refactor");
    }
}
