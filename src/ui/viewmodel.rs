//! View model types representing renderable UI state.
//!
//! View models are computed from [`AppState`](crate::app::AppState) by the
//! `compute_*` methods and consumed by a [`Display`](super::Display). They
//! contain no business logic, only display-ready data: windowed rows,
//! highlight ranges, classified diff lines.
//!
//! # Example
//!
//! ```rust
//! use issuedeck::ui::viewmodel::{FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     display_items: vec![],
//!     selected_index: 0,
//!     header: HeaderInfo {
//!         title: " Open Issues (0) ".to_string(),
//!         repository: "acme/widgets".to_string(),
//!     },
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//!     empty_state: None,
//!     search_bar: None,
//!     label_picker: None,
//!     notice: None,
//! };
//! assert!(vm.display_items.is_empty());
//! ```

/// List view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Rows visible in the current window.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,
    pub footer: FooterInfo,

    /// Shown instead of the table when nothing matches.
    pub empty_state: Option<EmptyState>,

    /// Present while typing a search query.
    pub search_bar: Option<SearchBarInfo>,

    /// Present while choosing labels.
    pub label_picker: Option<LabelPickerInfo>,

    pub notice: Option<NoticeInfo>,
}

/// One row of the issue/pull request table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// `#123`
    pub number: String,

    /// Title, truncated to the title column.
    pub title: String,

    /// `Open` or `Closed`.
    pub state: String,
    pub is_open: bool,

    pub author: String,

    /// Comma-separated label names.
    pub labels: String,

    pub is_selected: bool,

    /// Character ranges of the title to highlight (search matches).
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// `owner/name`, shown at the left edge when it fits.
    pub repository: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No open issues").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
}

/// Label picker overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPickerInfo {
    pub entries: Vec<LabelEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    pub name: String,
    pub is_checked: bool,
    pub is_selected: bool,
}

/// Error line shown above the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeInfo {
    pub message: String,
}

/// Detail view model for an issue or pull request and its comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailViewModel {
    pub header: HeaderInfo,

    /// Lines visible in the current window.
    pub lines: Vec<DetailLine>,

    pub footer: FooterInfo,
    pub notice: Option<NoticeInfo>,
}

/// One rendered line of a detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub text: String,
    pub kind: DetailLineKind,

    /// Belongs to the entry under the cursor (the item or one comment).
    pub is_focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLineKind {
    Title,
    /// State, author, age and similar facts.
    Meta,
    Labels,
    Body,
    /// "alice commented 3 hours ago"
    CommentHeader,
    CommentBody,
    Blank,
}

/// Diff view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffViewModel {
    pub header: HeaderInfo,

    /// Lines visible in the current window.
    pub lines: Vec<DiffLine>,

    pub footer: FooterInfo,
    pub notice: Option<NoticeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub text: String,
    pub kind: DiffLineKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    /// `@@ -1,3 +1,4 @@`
    Hunk,
    Added,
    Removed,
    /// Context lines and file headers (`+++`, `---`, `index`).
    Plain,
}

impl DiffLineKind {
    /// Classifies one line of a unified diff.
    ///
    /// # Example
    ///
    /// ```rust
    /// use issuedeck::ui::viewmodel::DiffLineKind;
    ///
    /// assert_eq!(DiffLineKind::classify("@@ -1 +1 @@"), DiffLineKind::Hunk);
    /// assert_eq!(DiffLineKind::classify("+++ b/src/lib.rs"), DiffLineKind::Plain);
    /// assert_eq!(DiffLineKind::classify("+fn main() {}"), DiffLineKind::Added);
    /// ```
    #[must_use]
    pub fn classify(line: &str) -> Self {
        if line.starts_with("@@") {
            Self::Hunk
        } else if line.starts_with("+++") || line.starts_with("---") || line.starts_with("index") {
            Self::Plain
        } else if line.starts_with('+') {
            Self::Added
        } else if line.starts_with('-') {
            Self::Removed
        } else {
            Self::Plain
        }
    }
}
