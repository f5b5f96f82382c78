//! The tagged unions the list, filters and controller branch on.
//!
//! [`Item`] is a row of the displayed list; [`Focused`] is whatever the display
//! currently has under the cursor, which in a detail view may also be a comment.

use super::issue::{Comment, Issue, IssueState};
use super::pull_request::PullRequestWithIssue;

/// Category part of an item's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Issue,
    PullRequest,
}

/// Dedup key for the displayed list: category plus number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub kind: ItemKind,
    pub number: u64,
}

/// One row of the displayed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Issue(Issue),
    PullRequest(PullRequestWithIssue),
}

impl Item {
    #[must_use]
    pub const fn key(&self) -> ItemKey {
        match self {
            Self::Issue(issue) => ItemKey {
                kind: ItemKind::Issue,
                number: issue.number,
            },
            Self::PullRequest(pr) => ItemKey {
                kind: ItemKind::PullRequest,
                number: pr.pr.number,
            },
        }
    }

    #[must_use]
    pub const fn number(&self) -> u64 {
        self.key().number
    }

    /// The issue carrying this item's body, labels, assignee and comments.
    #[must_use]
    pub const fn issue(&self) -> &Issue {
        match self {
            Self::Issue(issue) => issue,
            Self::PullRequest(pr) => &pr.issue,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Issue(issue) => &issue.title,
            Self::PullRequest(pr) => &pr.pr.title,
        }
    }

    #[must_use]
    pub fn author(&self) -> &str {
        match self {
            Self::Issue(issue) => &issue.author,
            Self::PullRequest(pr) => &pr.pr.author,
        }
    }

    #[must_use]
    pub const fn state(&self) -> IssueState {
        match self {
            Self::Issue(issue) => issue.state,
            Self::PullRequest(pr) => pr.pr.state,
        }
    }

    #[must_use]
    pub fn html_url(&self) -> &str {
        match self {
            Self::Issue(issue) => &issue.html_url,
            Self::PullRequest(pr) => &pr.pr.html_url,
        }
    }

    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        matches!(self, Self::PullRequest(_))
    }
}

impl From<Issue> for Item {
    fn from(issue: Issue) -> Self {
        Self::Issue(issue)
    }
}

impl From<PullRequestWithIssue> for Item {
    fn from(pr: PullRequestWithIssue) -> Self {
        Self::PullRequest(pr)
    }
}

/// What the display reports as focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focused {
    Item(Item),
    Comment {
        /// The issue or pull request the comment is shown under.
        parent: Item,
        comment: Comment,
    },
}

impl Focused {
    /// The focused item, or the item a focused comment belongs to.
    #[must_use]
    pub const fn item(&self) -> &Item {
        match self {
            Self::Item(item) | Self::Comment { parent: item, .. } => item,
        }
    }

    #[must_use]
    pub fn html_url(&self) -> &str {
        match self {
            Self::Item(item) => item.html_url(),
            Self::Comment { comment, .. } => &comment.html_url,
        }
    }

    /// Author of the focused entry. A pull request resolves to its issue twin.
    #[must_use]
    pub fn author(&self) -> &str {
        match self {
            Self::Item(item) => &item.issue().author,
            Self::Comment { comment, .. } => &comment.author,
        }
    }
}
