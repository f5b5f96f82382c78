//! Controller state and view model computation.
//!
//! [`AppState`] is the single owner of everything the controller touches: the
//! [`ViewModel`], the [`EventBus`] wired to it, the remote service, the
//! current [`Mode`] and the transient input state (search query, label
//! picker, pending editor flow, error notice).
//!
//! # View Model Computation
//!
//! The `compute_*` methods transform a state snapshot into a renderable view
//! model for the current mode, handling windowing, fuzzy match highlighting
//! and responsive column widths based on terminal dimensions.
//!
//! # Example
//!
//! ```rust
//! use issuedeck::app::AppState;
//! use issuedeck::domain::Issue;
//! use issuedeck::remote::{InMemoryRemote, Repository};
//! use issuedeck::ui::Theme;
//! use std::sync::Arc;
//!
//! let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
//! remote.add_issue(Issue::new(1, "Crash on start", "bob"));
//!
//! let mut state = AppState::new(remote, Repository::new("acme", "widgets"), "alice", Theme::default())?;
//! state.publish(issuedeck::events::SHOW_OPEN_ISSUES, &[])?;
//!
//! let vm = state.compute_viewmodel(24, 100);
//! assert_eq!(vm.header.title, " Open Issues (1) ");
//! assert_eq!(vm.display_items[0].number, "#1");
//! # Ok::<(), issuedeck::IssueDeckError>(())
//! ```

use super::modes::{DetailState, InputMode, Mode, Partition, PendingEdit};
use super::view_model::ViewModel;
use crate::domain::error::Result;
use crate::domain::{time_since_now, Focused, Issue, IssueState, Item, Label};
use crate::events::{self, EventBus};
use crate::filter::Participation;
use crate::remote::{RemoteService, Repository};
use crate::ui::components::{title_width, LIST_CHROME_ROWS, PAGE_CHROME_ROWS, SEARCH_CHROME_ROWS};
use crate::ui::helpers::truncate;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DetailLine, DetailLineKind, DetailViewModel, DiffLine, DiffLineKind, DiffViewModel, DisplayItem,
    EmptyState, FooterInfo, HeaderInfo, LabelEntry, LabelPickerInfo, NoticeInfo, SearchBarInfo,
    UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Label checklist shown in [`InputMode::LabelPicker`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPicker {
    /// Repository labels, fetched on first open.
    pub labels: Vec<Label>,
    pub checked: BTreeSet<String>,
    pub cursor: usize,
}

impl LabelPicker {
    pub fn cursor_down(&mut self) {
        if !self.labels.is_empty() {
            self.cursor = (self.cursor + 1) % self.labels.len();
        }
    }

    pub fn cursor_up(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        self.cursor = self.cursor.checked_sub(1).unwrap_or(self.labels.len() - 1);
    }

    /// Checks or unchecks the label under the cursor.
    pub fn toggle(&mut self) {
        let Some(label) = self.labels.get(self.cursor) else {
            return;
        };
        if !self.checked.remove(&label.name) {
            self.checked.insert(label.name.clone());
        }
    }

    /// Checked label names, in repository order.
    #[must_use]
    pub fn selection(&self) -> Vec<String> {
        self.labels
            .iter()
            .filter(|label| self.checked.contains(&label.name))
            .map(|label| label.name.clone())
            .collect()
    }
}

/// Everything the controller reads and mutates.
pub struct AppState {
    pub view: ViewModel,

    /// List controls publish here; the subscribers drive [`view`](Self::view).
    pub bus: EventBus<ViewModel>,

    pub remote: Arc<dyn RemoteService>,

    pub repository: Repository,

    /// Login of the authenticated user.
    pub user: String,

    pub mode: Mode,

    pub input_mode: InputMode,

    /// Query being typed in [`InputMode::Search`]. Published on submit.
    pub search_query: String,

    pub label_picker: LabelPicker,

    /// Flow waiting for [`Event::EditorClosed`](super::Event::EditorClosed).
    pub pending: Option<PendingEdit>,

    /// Error shown until the next event.
    pub notice: Option<String>,

    pub theme: Theme,
}

impl AppState {
    /// Creates the controller state in [`Mode::IssueList`] and subscribes the
    /// view model to every list control on a fresh bus.
    ///
    /// Nothing is fetched; publish [`events::SHOW_OPEN_ISSUES`] to load the
    /// first list.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDeckError::UnknownEvent`](crate::IssueDeckError::UnknownEvent)
    /// if a subscription names an event outside [`events::EVENTS`].
    pub fn new(
        remote: Arc<dyn RemoteService>,
        repository: Repository,
        user: impl Into<String>,
        theme: Theme,
    ) -> Result<Self> {
        let user = user.into();
        let mut bus = EventBus::new(events::EVENTS);
        subscribe_view(&mut bus)?;

        Ok(Self {
            view: ViewModel::new(remote.clone(), user.clone()),
            bus,
            remote,
            repository,
            user,
            mode: Mode::IssueList,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            label_picker: LabelPicker::default(),
            pending: None,
            notice: None,
            theme,
        })
    }

    /// Publishes `name` on the bus with the view model as context.
    ///
    /// # Errors
    ///
    /// Returns the bus error for unknown names, or the first subscriber error.
    pub fn publish(&mut self, name: &str, args: &[String]) -> Result<()> {
        self.bus.publish(&mut self.view, name, args)
    }

    /// The entry the display reports as focused.
    ///
    /// In the list this is the selected item; in a detail view the item or
    /// comment under the cursor; in a diff the pull request.
    #[must_use]
    pub fn focused(&self) -> Option<Focused> {
        match &self.mode {
            Mode::IssueList => self.view.focused_item().cloned().map(Focused::Item),
            Mode::IssueDetail(detail) | Mode::PrDetail(detail) => Some(detail.focused()),
            Mode::PrDiff { detail, .. } => Some(Focused::Item(detail.item.clone())),
        }
    }

    /// Fetches the comments of `item` and switches to its detail view.
    ///
    /// # Errors
    ///
    /// Propagates the remote error; the mode is unchanged in that case.
    pub fn enter_detail(&mut self, item: Item) -> Result<()> {
        let comments = self.remote.list_comments(item.issue())?;
        tracing::debug!(number = item.number(), comments = comments.len(), "entering detail");

        let detail = DetailState::new(item, comments);
        self.mode = if detail.item.is_pull_request() {
            Mode::PrDetail(detail)
        } else {
            Mode::IssueDetail(detail)
        };
        Ok(())
    }

    /// Swaps the snapshot shown in the current detail view for `issue` when
    /// it is the same item. Comments and cursor are kept.
    pub fn replace_detail_issue(&mut self, issue: &Issue) {
        let detail = match &mut self.mode {
            Mode::IssueDetail(detail) | Mode::PrDetail(detail) | Mode::PrDiff { detail, .. } => detail,
            Mode::IssueList => return,
        };
        match &mut detail.item {
            Item::Issue(shown) if shown.number == issue.number => *shown = issue.clone(),
            Item::PullRequest(shown) if shown.issue.number == issue.number => shown.replace_issue(issue.clone()),
            _ => {}
        }
    }

    /// Loads the repository labels on first use and switches to
    /// [`InputMode::LabelPicker`] with the active label stage checked.
    ///
    /// # Errors
    ///
    /// Propagates the remote error of the label fetch.
    pub fn open_label_picker(&mut self) -> Result<()> {
        if self.label_picker.labels.is_empty() {
            self.label_picker.labels = self.remote.list_labels()?;
        }
        self.label_picker.checked = self.view.labels().iter().cloned().collect();
        self.label_picker.cursor = 0;
        self.input_mode = InputMode::LabelPicker;
        Ok(())
    }

    /// Computes the list view model for the given terminal size.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let items = self.view.items();
        let available_rows = self.calculate_available_rows(rows);
        let (visible_start, visible_end) = window(self.view.selected(), items.len(), available_rows);

        let matcher = if self.view.search().is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };

        let display_items: Vec<DisplayItem> = items[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(relative_idx, item)| {
                let absolute_idx = visible_start + relative_idx;
                self.compute_display_item(item, absolute_idx, cols, matcher.as_ref())
            })
            .collect();

        UIViewModel {
            display_items,
            selected_index: self.view.selected().saturating_sub(visible_start),
            header: self.compute_header(),
            footer: self.compute_footer(),
            empty_state: self.compute_empty_state(),
            search_bar: self.compute_search_bar(),
            label_picker: self.compute_label_picker(),
            notice: self.compute_notice(),
        }
    }

    fn compute_display_item(
        &self,
        item: &Item,
        absolute_idx: usize,
        cols: usize,
        matcher: Option<&SkimMatcherV2>,
    ) -> DisplayItem {
        let issue = item.issue();
        let highlight_ranges = matcher.map_or_else(Vec::new, |m| self.compute_highlight_ranges(item.title(), m));

        DisplayItem {
            number: format!("#{}", item.number()),
            title: truncate(item.title(), title_width(cols).saturating_sub(1)),
            state: item.state().label().to_string(),
            is_open: item.state() == IssueState::Open,
            author: item.author().to_string(),
            labels: issue
                .labels
                .iter()
                .map(|label| label.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            is_selected: absolute_idx == self.view.selected(),
            highlight_ranges,
        }
    }

    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let mut indices: Vec<usize> = self
            .view
            .search()
            .split_whitespace()
            .filter_map(|token| matcher.fuzzy_indices(text, token))
            .flat_map(|(_score, indices)| indices)
            .collect();
        indices.sort_unstable();
        indices.dedup();

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn header(&self, title: String) -> HeaderInfo {
        HeaderInfo {
            title,
            repository: self.repository.full_name(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let mut title = format!(" {} ({})", self.view.partition().title(), self.view.items().len());
        if self.view.participation() != Participation::All {
            title.push_str(&format!(" · {}", self.view.participation().label()));
        }
        if !self.view.labels().is_empty() {
            title.push_str(&format!(" · labels: {}", self.view.labels().join(", ")));
        }
        if !self.view.search().is_empty() {
            title.push_str(&format!(" · \"{}\"", self.view.search()));
        }
        title.push(' ');
        self.header(title)
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Search => "ESC: clear search  Enter: apply  Type to filter titles",
            InputMode::LabelPicker => "j/k: navigate  Space: toggle  Enter: apply  ESC: cancel",
            InputMode::Normal => {
                "j/k: navigate  Enter: open  1/2/3: open/closed/PRs  a/m/A/@: participation  l/L: labels  /: search  n: new  c: close  o: reopen  e: edit  C: comment  b: browser  q: quit"
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.view.items().is_empty() {
            return None;
        }
        let filtered = !self.view.labels().is_empty()
            || self.view.participation() != Participation::All
            || !self.view.search().is_empty();
        let subtitle = if filtered {
            "Nothing matches the active filters. Press a, L or / then ESC to widen them."
        } else if self.view.partition() == Partition::OpenIssues {
            "Press n to open a new issue."
        } else {
            "Press 1 to go back to open issues."
        };
        Some(EmptyState {
            message: format!("No {}", self.view.partition().title().to_lowercase()),
            subtitle: subtitle.to_string(),
        })
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        (self.input_mode == InputMode::Search).then(|| SearchBarInfo {
            query: self.search_query.clone(),
        })
    }

    fn compute_label_picker(&self) -> Option<LabelPickerInfo> {
        (self.input_mode == InputMode::LabelPicker).then(|| LabelPickerInfo {
            entries: self
                .label_picker
                .labels
                .iter()
                .enumerate()
                .map(|(idx, label)| LabelEntry {
                    name: label.name.clone(),
                    is_checked: self.label_picker.checked.contains(&label.name),
                    is_selected: idx == self.label_picker.cursor,
                })
                .collect(),
        })
    }

    fn compute_notice(&self) -> Option<NoticeInfo> {
        self.notice.as_ref().map(|message| NoticeInfo {
            message: message.clone(),
        })
    }

    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Search => total_rows.saturating_sub(SEARCH_CHROME_ROWS),
            InputMode::Normal | InputMode::LabelPicker => total_rows.saturating_sub(LIST_CHROME_ROWS),
        }
    }

    /// Computes the detail view model of an issue or pull request.
    ///
    /// The window scrolls so the entry under the cursor stays visible.
    /// Outside a detail mode the view model is empty.
    #[must_use]
    pub fn compute_detail_viewmodel(&self, rows: usize, cols: usize) -> DetailViewModel {
        let (title, lines, footer) = match &self.mode {
            Mode::IssueDetail(detail) => (
                format!(" Issue #{} ", detail.item.number()),
                detail_lines(detail, cols.saturating_sub(2)),
                "j/k: move  c: close  o: reopen  e: edit  C: comment  b: browser  ESC: back  q: quit",
            ),
            Mode::PrDetail(detail) => (
                format!(" Pull Request #{} ", detail.item.number()),
                detail_lines(detail, cols.saturating_sub(2)),
                "j/k: move  d: diff  e: edit  C: comment  b: browser  ESC: back  q: quit",
            ),
            Mode::IssueList | Mode::PrDiff { .. } => (String::new(), Vec::new(), ""),
        };

        let available_rows = rows.saturating_sub(PAGE_CHROME_ROWS);
        let focus_start = lines.iter().position(|line| line.is_focused).unwrap_or(0);
        let focus_end = lines.iter().rposition(|line| line.is_focused).unwrap_or(0);
        let start = if focus_end < available_rows {
            0
        } else {
            focus_start.min(lines.len().saturating_sub(available_rows))
        };
        let end = (start + available_rows).min(lines.len());

        DetailViewModel {
            header: self.header(title),
            lines: lines[start..end].to_vec(),
            footer: FooterInfo {
                keybindings: footer.to_string(),
            },
            notice: self.compute_notice(),
        }
    }

    /// Computes the diff view model, starting at the current scroll offset.
    #[must_use]
    pub fn compute_diff_viewmodel(&self, rows: usize, _cols: usize) -> DiffViewModel {
        let available_rows = rows.saturating_sub(PAGE_CHROME_ROWS);

        let (title, lines) = match &self.mode {
            Mode::PrDiff { detail, diff, scroll } => {
                let all: Vec<&str> = diff.lines().collect();
                let start = (*scroll).min(all.len().saturating_sub(available_rows));
                let end = (start + available_rows).min(all.len());
                let lines = all[start..end]
                    .iter()
                    .map(|line| DiffLine {
                        text: (*line).to_string(),
                        kind: DiffLineKind::classify(line),
                    })
                    .collect();
                (diff_title(detail), lines)
            }
            _ => (String::new(), Vec::new()),
        };

        DiffViewModel {
            header: self.header(title),
            lines,
            footer: FooterInfo {
                keybindings: "j/k: scroll  Space/PgDn: page  b: browser  ESC: back  q: quit".to_string(),
            },
            notice: self.compute_notice(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("repository", &self.repository.full_name())
            .field("user", &self.user)
            .field("mode", &self.mode.name())
            .field("input_mode", &self.input_mode)
            .field("view", &self.view)
            .field("pending", &self.pending)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

fn subscribe_view(bus: &mut EventBus<ViewModel>) -> Result<()> {
    bus.register(events::SHOW_OPEN_ISSUES, Box::new(|view, _| view.show_open_issues()))?;
    bus.register(events::SHOW_CLOSED_ISSUES, Box::new(|view, _| view.show_closed_issues()))?;
    bus.register(events::SHOW_PULL_REQUESTS, Box::new(|view, _| view.show_pull_requests()))?;
    bus.register(
        events::FILTER_BY_LABELS,
        Box::new(|view, labels| view.set_label_filter(labels.to_vec())),
    )?;
    bus.register(events::CLEAR_LABEL_FILTERS, Box::new(|view, _| view.clear_label_filters()))?;
    bus.register(
        events::SHOW_ALL,
        Box::new(|view, _| view.set_participation_filter(Participation::All)),
    )?;
    bus.register(
        events::SHOW_CREATED_BY_YOU,
        Box::new(|view, _| view.set_participation_filter(Participation::CreatedBy)),
    )?;
    bus.register(
        events::SHOW_ASSIGNED_TO_YOU,
        Box::new(|view, _| view.set_participation_filter(Participation::AssignedTo)),
    )?;
    bus.register(
        events::SHOW_MENTIONING_YOU,
        Box::new(|view, _| view.set_participation_filter(Participation::Mentions)),
    )?;
    bus.register(events::SEARCH, Box::new(|view, query| view.set_search(query.join(" "))))?;
    Ok(())
}

/// Visible `[start, end)` range of `len` rows centred on `selected`.
fn window(selected: usize, len: usize, available: usize) -> (usize, usize) {
    let mut visible_start = selected.saturating_sub(available / 2);
    let visible_end = (visible_start + available).min(len);

    if visible_end - visible_start < available && len >= available {
        visible_start = visible_end.saturating_sub(available);
    }
    (visible_start.min(visible_end), visible_end)
}

fn diff_title(detail: &DetailState) -> String {
    match &detail.item {
        Item::PullRequest(pull) => match (pull.pr.additions, pull.pr.deletions) {
            (Some(added), Some(removed)) => format!(" Diff #{} (+{added} -{removed}) ", pull.number()),
            _ => format!(" Diff #{} ", pull.number()),
        },
        Item::Issue(issue) => format!(" Diff #{} ", issue.number),
    }
}

fn detail_lines(detail: &DetailState, width: usize) -> Vec<DetailLine> {
    let item_focused = detail.cursor == 0;
    let issue = detail.item.issue();
    let line = |text: String, kind: DetailLineKind| DetailLine {
        text,
        kind,
        is_focused: item_focused,
    };

    let mut lines = vec![line(format!("#{} {}", detail.item.number(), detail.item.title()), DetailLineKind::Title)];

    lines.push(line(
        format!(
            "{} · opened {} by {} · {} comments",
            detail.item.state().label(),
            time_since_now(issue.created_at),
            detail.item.author(),
            issue.comments
        ),
        DetailLineKind::Meta,
    ));
    if let Item::PullRequest(pull) = &detail.item {
        lines.push(line(
            format!("{} → {} · {}", pull.pr.head_ref, pull.pr.base_ref, pull.merge_status()),
            DetailLineKind::Meta,
        ));
        if let (Some(commits), Some(added), Some(removed)) = (pull.pr.commits, pull.pr.additions, pull.pr.deletions) {
            lines.push(line(format!("{commits} commits · +{added} -{removed}"), DetailLineKind::Meta));
        }
    }
    if let Some(assignee) = &issue.assignee {
        lines.push(line(format!("Assignee: {assignee}"), DetailLineKind::Meta));
    }
    if let Some(milestone) = &issue.milestone {
        lines.push(line(format!("Milestone: {milestone}"), DetailLineKind::Meta));
    }
    if !issue.labels.is_empty() {
        let names: Vec<&str> = issue.labels.iter().map(|label| label.name.as_str()).collect();
        lines.push(line(format!("Labels: {}", names.join(", ")), DetailLineKind::Labels));
    }

    lines.push(line(String::new(), DetailLineKind::Blank));
    if issue.body.trim().is_empty() {
        lines.push(line("No description provided.".to_string(), DetailLineKind::Meta));
    } else {
        lines.extend(wrap(&issue.body, width).into_iter().map(|text| line(text, DetailLineKind::Body)));
    }

    for (idx, comment) in detail.comments.iter().enumerate() {
        let is_focused = detail.cursor == idx + 1;
        let comment_line = |text: String, kind: DetailLineKind| DetailLine { text, kind, is_focused };

        lines.push(comment_line(String::new(), DetailLineKind::Blank));
        lines.push(comment_line(
            format!("{} commented {}", comment.author, time_since_now(comment.created_at)),
            DetailLineKind::CommentHeader,
        ));
        lines.extend(
            wrap(&comment.body, width.saturating_sub(4))
                .into_iter()
                .map(|text| comment_line(format!("    {text}"), DetailLineKind::CommentBody)),
        );
    }
    lines
}

/// Hard-wraps each line of `text` at `width` characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut wrapped = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        wrapped.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, PullRequest, PullRequestWithIssue};
    use crate::remote::InMemoryRemote;
    use chrono::Utc;

    fn state_with(issues: usize) -> AppState {
        let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
        for n in 1..=issues {
            remote.add_issue(Issue::new(n as u64, format!("Issue {n}"), "bob"));
        }
        let mut state =
            AppState::new(remote, Repository::new("acme", "widgets"), "alice", Theme::default()).unwrap();
        state.publish(events::SHOW_OPEN_ISSUES, &[]).unwrap();
        state
    }

    #[test]
    fn window_keeps_selection_centred() {
        assert_eq!(window(0, 100, 10), (0, 10));
        assert_eq!(window(50, 100, 10), (45, 55));
        assert_eq!(window(99, 100, 10), (90, 100));
        assert_eq!(window(2, 3, 10), (0, 3));
    }

    #[test]
    fn list_viewmodel_windows_the_items() {
        let mut state = state_with(40);
        for _ in 0..30 {
            state.view.move_selection_down();
        }

        let vm = state.compute_viewmodel(20, 100);
        assert_eq!(vm.display_items.len(), 20 - LIST_CHROME_ROWS);
        assert!(vm.display_items[vm.selected_index].is_selected);
        assert_eq!(vm.display_items[vm.selected_index].number, "#31");
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn search_matches_are_highlighted() {
        let mut state = state_with(3);
        state.publish(events::SEARCH, &["issue".to_string(), "2".to_string()]).unwrap();

        let vm = state.compute_viewmodel(24, 100);
        assert_eq!(vm.display_items.len(), 1);
        assert_eq!(vm.display_items[0].highlight_ranges, vec![(0, 5), (6, 7)]);
        assert!(vm.header.title.contains("\"issue 2\""));
    }

    #[test]
    fn empty_list_explains_itself() {
        let mut state = state_with(1);
        state.publish(events::SHOW_CREATED_BY_YOU, &[]).unwrap();

        let vm = state.compute_viewmodel(24, 100);
        let empty = vm.empty_state.unwrap();
        assert_eq!(empty.message, "No open issues");
        assert!(empty.subtitle.contains("filters"));
        assert_eq!(vm.header.title, " Open Issues (0) · created by you ");
    }

    #[test]
    fn label_picker_selection_follows_repository_order() {
        let mut picker = LabelPicker {
            labels: vec![Label::new("bug", "f00"), Label::new("docs", "0f0"), Label::new("ui", "00f")],
            ..LabelPicker::default()
        };
        picker.cursor_up();
        picker.toggle();
        picker.cursor = 0;
        picker.toggle();
        assert_eq!(picker.selection(), vec!["bug".to_string(), "ui".to_string()]);

        picker.toggle();
        assert_eq!(picker.selection(), vec!["ui".to_string()]);
    }

    #[test]
    fn detail_lines_mark_the_focused_comment() {
        let comment = Comment {
            id: 7,
            author: "carol".into(),
            body: "Same here".into(),
            created_at: Utc::now(),
            html_url: String::new(),
            issue_number: 1,
        };
        let mut detail = DetailState::new(Issue::new(1, "Crash", "bob").with_body("Boom").into(), vec![comment]);
        detail.cursor_down();

        let lines = detail_lines(&detail, 80);
        let focused: Vec<&str> = lines.iter().filter(|l| l.is_focused).map(|l| l.text.as_str()).collect();
        assert_eq!(focused.len(), 3);
        assert!(focused[1].starts_with("carol commented"));
        assert_eq!(focused[2], "    Same here");
        assert!(lines.iter().any(|l| l.kind == DetailLineKind::Body && l.text == "Boom"));
    }

    #[test]
    fn diff_viewmodel_scrolls_and_classifies() {
        let mut state = state_with(0);
        let mut pr = PullRequest::new(5, "Add cache", "bob");
        pr.additions = Some(2);
        pr.deletions = Some(2);
        let pull = PullRequestWithIssue::new(pr, Issue::new(5, "Add cache", "bob").with_state(IssueState::Open));
        let diff = "--- a/x\n+++ b/x\n@@ -1,3 +1,3 @@\n-one\n+uno\n two\n-three\n+tres";
        let diff_mode = |scroll| Mode::PrDiff {
            detail: DetailState::new(pull.clone().into(), vec![]),
            diff: diff.to_string(),
            scroll,
        };

        state.mode = diff_mode(2);
        let vm = state.compute_diff_viewmodel(PAGE_CHROME_ROWS + 4, 80);
        assert_eq!(vm.header.title, " Diff #5 (+2 -2) ");
        assert_eq!(vm.lines[0].text, "@@ -1,3 +1,3 @@");
        let kinds: Vec<DiffLineKind> = vm.lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![DiffLineKind::Hunk, DiffLineKind::Removed, DiffLineKind::Added, DiffLineKind::Plain]);

        state.mode = diff_mode(100);
        let vm = state.compute_diff_viewmodel(PAGE_CHROME_ROWS + 4, 80);
        let texts: Vec<&str> = vm.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["+uno", " two", "-three", "+tres"]);
    }

    #[test]
    fn wrap_splits_long_lines() {
        assert_eq!(wrap("abcdef\n\ngh", 4), vec!["abcd", "ef", "", "gh"]);
    }
}
