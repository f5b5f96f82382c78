//! Issue, comment and label snapshots.
//!
//! These are plain values copied out of the remote service. The crate never
//! owns persistence: mutations go through [`RemoteService`](crate::remote::RemoteService)
//! and the returned snapshot replaces the cached one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an issue or pull request is open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Query-string form used by the remote API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Display label shown next to the item title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

/// A repository label. Immutable from this crate's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`, as reported by the service.
    pub color: String,
}

impl Label {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// An issue snapshot.
///
/// Identity is the `number`; two snapshots of the same issue compare unequal
/// when any field differs, so dedup uses [`ItemKey`](crate::domain::ItemKey)
/// rather than `PartialEq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    pub author: String,
    pub assignee: Option<String>,
    pub labels: Vec<Label>,
    pub comments: u32,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    pub milestone: Option<String>,
}

impl Issue {
    /// Creates an open issue with an empty body, created now.
    ///
    /// # Examples
    ///
    /// ```
    /// use issuedeck::domain::{Issue, Label};
    ///
    /// let issue = Issue::new(1, "Crash on start", "alice")
    ///     .with_body("Steps to reproduce")
    ///     .with_labels(vec![Label::new("bug", "d73a4a")]);
    /// assert!(issue.is_open());
    /// assert!(issue.has_any_label(&["bug".to_string()]));
    /// ```
    #[must_use]
    pub fn new(number: u64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            body: String::new(),
            state: IssueState::Open,
            author: author.into(),
            assignee: None,
            labels: Vec::new(),
            comments: 0,
            created_at: Utc::now(),
            html_url: String::new(),
            milestone: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    #[must_use]
    pub const fn with_state(mut self, state: IssueState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, IssueState::Open)
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, IssueState::Closed)
    }

    /// Returns `true` if any label on the issue has one of the given names.
    #[must_use]
    pub fn has_any_label(&self, names: &[String]) -> bool {
        self.labels
            .iter()
            .any(|label| names.iter().any(|name| name == &label.name))
    }
}

/// A comment on an issue or on a pull request's issue twin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    /// Number of the issue this comment belongs to.
    pub issue_number: u64,
}
