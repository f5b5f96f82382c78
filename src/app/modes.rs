//! View and input mode state types for the controller.
//!
//! [`Mode`] is the top-level view the controller is in; it decides which
//! events are valid. [`InputMode`] only matters in the list view and decides
//! how keystrokes are interpreted (commands, search typing, label picking).
//!
//! # State Machine
//!
//! ```text
//! IssueList ──Detail──► IssueDetail ──Back──► IssueList
//! IssueList ──Detail──► PrDetail ──Diff──► PrDiff
//! PrDiff ──Back──► PrDetail ──Back──► IssueList
//! ```

use crate::domain::{Comment, Focused, Issue, Item};

/// Detail view of one item and its comment thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    pub item: Item,
    pub comments: Vec<Comment>,
    /// `0` focuses the item itself, `n` focuses `comments[n - 1]`.
    pub cursor: usize,
}

impl DetailState {
    #[must_use]
    pub const fn new(item: Item, comments: Vec<Comment>) -> Self {
        Self {
            item,
            comments,
            cursor: 0,
        }
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn focused(&self) -> Focused {
        match self.cursor.checked_sub(1).and_then(|i| self.comments.get(i)) {
            Some(comment) => Focused::Comment {
                parent: self.item.clone(),
                comment: comment.clone(),
            },
            None => Focused::Item(self.item.clone()),
        }
    }

    /// Moves the cursor down, wrapping from the last comment back to the item.
    pub fn cursor_down(&mut self) {
        self.cursor = (self.cursor + 1) % (self.comments.len() + 1);
    }

    /// Moves the cursor up, wrapping from the item to the last comment.
    pub fn cursor_up(&mut self) {
        if self.cursor == 0 {
            self.cursor = self.comments.len();
        } else {
            self.cursor -= 1;
        }
    }
}

/// The active top-level view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// The filtered list of issues or pull requests.
    #[default]
    IssueList,
    IssueDetail(DetailState),
    PrDetail(DetailState),
    /// Unified diff of the pull request whose detail view it was opened from.
    PrDiff {
        detail: DetailState,
        diff: String,
        scroll: usize,
    },
}

impl Mode {
    /// Short name used in logs and the header.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IssueList => "issue_list",
            Self::IssueDetail(_) => "issue_detail",
            Self::PrDetail(_) => "pr_detail",
            Self::PrDiff { .. } => "pr_diff",
        }
    }

    /// The detail state shown by this mode, if any.
    #[must_use]
    pub const fn detail(&self) -> Option<&DetailState> {
        match self {
            Self::IssueList => None,
            Self::IssueDetail(detail) | Self::PrDetail(detail) | Self::PrDiff { detail, .. } => Some(detail),
        }
    }
}

/// How keystrokes are interpreted in the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Commands and navigation.
    #[default]
    Normal,
    /// Typing a title search query.
    Search,
    /// Choosing labels to filter by.
    LabelPicker,
}

/// Which source partition the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partition {
    #[default]
    OpenIssues,
    ClosedIssues,
    PullRequests,
}

impl Partition {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::OpenIssues => "Open Issues",
            Self::ClosedIssues => "Closed Issues",
            Self::PullRequests => "Pull Requests",
        }
    }
}

/// Flow waiting for the external editor to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEdit {
    NewIssue,
    EditIssue(Issue),
    EditComment(Comment),
    /// New comment on the item (the issue twin for pull requests).
    Comment(Item),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: u64) -> Comment {
        Comment {
            id,
            author: "bob".into(),
            body: format!("comment {id}"),
            created_at: Utc::now(),
            html_url: String::new(),
            issue_number: 1,
        }
    }

    #[test]
    fn cursor_wraps_through_item_and_comments() {
        let mut detail = DetailState::new(Issue::new(1, "t", "bob").into(), vec![comment(1), comment(2)]);
        assert!(matches!(detail.focused(), Focused::Item(_)));

        detail.cursor_down();
        assert!(matches!(detail.focused(), Focused::Comment { comment, .. } if comment.id == 1));

        detail.cursor_down();
        detail.cursor_down();
        assert_eq!(detail.cursor, 0);

        detail.cursor_up();
        assert!(matches!(detail.focused(), Focused::Comment { comment, .. } if comment.id == 2));
    }
}
