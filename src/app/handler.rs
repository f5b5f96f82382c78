//! Event handling and state transition logic.
//!
//! This module implements the modal controller: it maps discrete input events
//! to view transitions, list control publications and mutating remote calls,
//! and returns the side effects it needs as [`Action`]s.
//!
//! # Architecture
//!
//! 1. The runtime maps a keypress to an [`Event`]
//! 2. [`handle_event`] pattern-matches the event against the current mode
//! 3. State mutations occur via `AppState`, the view model and the event bus
//! 4. Actions are collected and returned for execution
//!
//! # Editor Flows
//!
//! Creating, editing and commenting suspend the controller: the flow is stored
//! in [`AppState::pending`] and [`Action::SpawnEditor`] is returned. The runtime
//! runs the editor and feeds [`Event::EditorClosed`] back, which resumes the
//! stored flow. [`handle_with_editor`] performs that round trip in one call.
//!
//! # Failures
//!
//! Remote and editor failures never escape [`handle_event`]: they are logged,
//! stored as [`AppState::notice`] and the previous view is kept. Empty titles,
//! empty comments and edits without permission abort silently.
//!
//! # Example
//!
//! ```rust
//! use issuedeck::app::{handle_event, Action, AppState, Event};
//! use issuedeck::remote::{InMemoryRemote, Repository};
//! use issuedeck::ui::Theme;
//! use std::sync::Arc;
//!
//! let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
//! let mut state = AppState::new(remote, Repository::new("acme", "widgets"), "alice", Theme::default())?;
//!
//! let (_, actions) = handle_event(&mut state, &Event::Quit)?;
//! assert_eq!(actions, vec![Action::Quit]);
//! # Ok::<(), issuedeck::IssueDeckError>(())
//! ```

use super::editor::{Editor, TerminalSuspend};
use super::modes::{InputMode, Mode, PendingEdit};
use super::templates::{
    format_issue_for_edit, format_issue_thread, parse_title_and_body, strip_comments, NEW_ISSUE_TEMPLATE,
};
use crate::app::{Action, AppState};
use crate::domain::error::{IssueDeckError, Result};
use crate::domain::{Focused, Item};
use crate::events;
use std::collections::VecDeque;

/// Lines moved by one page in the diff view.
const DIFF_PAGE: usize = 20;

/// Discrete input events understood by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the list selection, detail cursor or diff scroll down.
    KeyDown,
    /// Moves the list selection, detail cursor or diff scroll up.
    KeyUp,
    /// Scrolls the diff one page down.
    PageDown,
    /// Scrolls the diff one page up.
    PageUp,
    /// Opens the detail view of the selected item.
    Detail,
    /// Leaves the diff or detail view.
    Back,

    /// Starts the new issue flow.
    OpenIssue,
    /// Closes the focused issue (pull requests excluded).
    CloseIssue,
    /// Reopens the focused issue if it is closed.
    ReopenIssue,
    /// Edits the focused issue or comment, if the user may.
    Edit,
    /// Comments on the focused issue or pull request.
    Comment,
    /// Shows the diff of the pull request in the detail view.
    Diff,
    OpenInBrowser,
    Quit,

    ShowOpenIssues,
    ShowClosedIssues,
    ShowPullRequests,
    ShowAll,
    ShowCreatedByYou,
    ShowAssignedToYou,
    ShowMentioningYou,
    OpenLabelPicker,
    ClearLabelFilters,
    /// Checks or unchecks the label under the picker cursor.
    ToggleLabel,
    /// Starts typing a title search.
    SearchMode,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,
    /// Applies the search query or the label selection.
    Submit,
    /// Leaves search typing or the label picker.
    Cancel,
    /// Re-derives the list of the current partition.
    Refresh,

    /// The external editor returned. `None` means it was cancelled.
    EditorClosed(Option<String>),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Returns
///
/// `(should_render, actions)`. Actions are executed in order by the caller.
///
/// # Errors
///
/// Remote and editor failures become a notice instead of an error. Anything
/// else propagates, e.g. [`IssueDeckError::UnknownEvent`] from the bus.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event, mode = state.mode.name()).entered();

    state.notice = None;
    match dispatch(state, event) {
        Err(e) if e.is_remote() || matches!(e, IssueDeckError::Editor(_)) => {
            tracing::error!(error = %e, "event failed, keeping the previous view");
            state.notice = Some(e.to_string());
            Ok((true, vec![]))
        }
        result => result,
    }
}

/// Like [`handle_event`], but runs every [`Action::SpawnEditor`] through
/// `editor` immediately and feeds the result back as
/// [`Event::EditorClosed`].
///
/// Returns the remaining actions. An editor that fails to start cancels the
/// pending flow and leaves a notice.
///
/// # Errors
///
/// Same as [`handle_event`].
pub fn handle_with_editor(
    state: &mut AppState,
    event: &Event,
    editor: &mut dyn Editor,
    display: &mut dyn TerminalSuspend,
) -> Result<(bool, Vec<Action>)> {
    let (mut render, actions) = handle_event(state, event)?;
    let mut queue: VecDeque<Action> = actions.into();
    let mut remaining = Vec::new();

    while let Some(action) = queue.pop_front() {
        let Action::SpawnEditor { seed } = action else {
            remaining.push(action);
            continue;
        };

        render = true;
        match editor.edit(&seed, display) {
            Ok(text) => {
                let (_, more) = handle_event(state, &Event::EditorClosed(text))?;
                queue.extend(more);
            }
            Err(e) => {
                tracing::error!(error = %e, "editor failed");
                state.pending = None;
                state.notice = Some(e.to_string());
            }
        }
    }
    Ok((render, remaining))
}

#[allow(clippy::too_many_lines)]
fn dispatch(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::KeyDown => {
            move_cursor(state, 1, false);
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            move_cursor(state, 1, true);
            Ok((true, vec![]))
        }
        Event::PageDown => {
            move_cursor(state, DIFF_PAGE, false);
            Ok((true, vec![]))
        }
        Event::PageUp => {
            move_cursor(state, DIFF_PAGE, true);
            Ok((true, vec![]))
        }
        Event::Detail => {
            if !matches!(state.mode, Mode::IssueList) {
                return Ok((false, vec![]));
            }
            let Some(item) = state.view.focused_item().cloned() else {
                tracing::debug!("no item selected");
                return Ok((false, vec![]));
            };
            state.enter_detail(item)?;
            Ok((true, vec![]))
        }
        Event::Back => Ok((back(state), vec![])),
        Event::OpenIssue => {
            if !matches!(state.mode, Mode::IssueList) {
                return Ok((false, vec![]));
            }
            state.pending = Some(PendingEdit::NewIssue);
            Ok((false, vec![spawn_editor(NEW_ISSUE_TEMPLATE)]))
        }
        Event::CloseIssue => change_state(state, true),
        Event::ReopenIssue => change_state(state, false),
        Event::Edit => Ok(edit(state)),
        Event::Comment => comment(state),
        Event::Diff => {
            let Mode::PrDetail(detail) = &state.mode else {
                return Ok((false, vec![]));
            };
            let Item::PullRequest(pull) = &detail.item else {
                return Ok((false, vec![]));
            };
            let diff = state.remote.diff(&pull.pr)?;
            tracing::debug!(number = pull.number(), bytes = diff.len(), "diff loaded");
            let detail = detail.clone();
            state.mode = Mode::PrDiff {
                detail,
                diff,
                scroll: 0,
            };
            Ok((true, vec![]))
        }
        Event::OpenInBrowser => {
            let Some(focused) = state.focused() else {
                return Ok((false, vec![]));
            };
            let url = focused.html_url();
            if url.is_empty() {
                tracing::debug!("focused entry has no url");
                return Ok((false, vec![]));
            }
            Ok((false, vec![Action::OpenUrl(url.to_string())]))
        }

        Event::ShowOpenIssues => show(state, events::SHOW_OPEN_ISSUES, &[]),
        Event::ShowClosedIssues => show(state, events::SHOW_CLOSED_ISSUES, &[]),
        Event::ShowPullRequests => show(state, events::SHOW_PULL_REQUESTS, &[]),
        Event::ShowAll => show(state, events::SHOW_ALL, &[]),
        Event::ShowCreatedByYou => show(state, events::SHOW_CREATED_BY_YOU, &[]),
        Event::ShowAssignedToYou => show(state, events::SHOW_ASSIGNED_TO_YOU, &[]),
        Event::ShowMentioningYou => show(state, events::SHOW_MENTIONING_YOU, &[]),
        Event::ClearLabelFilters => show(state, events::CLEAR_LABEL_FILTERS, &[]),
        Event::Refresh => {
            state.view.refresh()?;
            Ok((true, vec![]))
        }
        Event::OpenLabelPicker => {
            state.open_label_picker()?;
            state.mode = Mode::IssueList;
            Ok((true, vec![]))
        }
        Event::ToggleLabel => {
            if state.input_mode != InputMode::LabelPicker {
                return Ok((false, vec![]));
            }
            state.label_picker.toggle();
            Ok((true, vec![]))
        }
        Event::SearchMode => {
            state.mode = Mode::IssueList;
            state.input_mode = InputMode::Search;
            state.search_query = state.view.search().to_string();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            state.search_query.push(*c);
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search {
                return Ok((false, vec![]));
            }
            state.search_query.pop();
            Ok((true, vec![]))
        }
        Event::Submit => submit(state),
        Event::Cancel => cancel(state),

        Event::EditorClosed(text) => editor_closed(state, text.as_deref()),
    }
}

fn spawn_editor(seed: &str) -> Action {
    Action::SpawnEditor {
        seed: seed.to_string(),
    }
}

fn move_cursor(state: &mut AppState, steps: usize, up: bool) {
    match (&mut state.mode, state.input_mode) {
        (Mode::IssueList, InputMode::LabelPicker) => {
            if up {
                state.label_picker.cursor_up();
            } else {
                state.label_picker.cursor_down();
            }
        }
        (Mode::IssueList, _) => {
            if up {
                state.view.move_selection_up();
            } else {
                state.view.move_selection_down();
            }
        }
        (Mode::IssueDetail(detail) | Mode::PrDetail(detail), _) => {
            if up {
                detail.cursor_up();
            } else {
                detail.cursor_down();
            }
        }
        (Mode::PrDiff { diff, scroll, .. }, _) => {
            let last = diff.lines().count().saturating_sub(1);
            *scroll = if up {
                scroll.saturating_sub(steps)
            } else {
                (*scroll + steps).min(last)
            };
        }
    }
}

fn back(state: &mut AppState) -> bool {
    let next = match std::mem::take(&mut state.mode) {
        Mode::PrDiff { detail, .. } => Mode::PrDetail(detail),
        Mode::IssueDetail(_) | Mode::PrDetail(_) => Mode::IssueList,
        Mode::IssueList => {
            state.mode = Mode::IssueList;
            return false;
        }
    };
    tracing::debug!(next = next.name(), "back");
    state.mode = next;
    true
}

fn show(state: &mut AppState, name: &str, args: &[String]) -> Result<(bool, Vec<Action>)> {
    state.publish(name, args)?;
    state.mode = Mode::IssueList;
    Ok((true, vec![]))
}

fn change_state(state: &mut AppState, close: bool) -> Result<(bool, Vec<Action>)> {
    let Some(focused) = state.focused() else {
        return Ok((false, vec![]));
    };
    let Item::Issue(issue) = focused.item() else {
        tracing::debug!("pull requests cannot be closed or reopened here");
        return Ok((false, vec![]));
    };

    let updated = match (close, issue.is_open()) {
        (true, true) => state.view.close(issue)?,
        (false, false) => state.view.reopen(issue)?,
        _ => {
            tracing::debug!(number = issue.number, state = issue.state.as_str(), "already in requested state");
            return Ok((false, vec![]));
        }
    };
    state.replace_detail_issue(&updated);
    Ok((true, vec![]))
}

/// Only the repository owner or the author may edit.
fn may_edit(state: &AppState, focused: &Focused) -> bool {
    state.repository.owner == state.user || focused.author() == state.user
}

fn edit(state: &mut AppState) -> (bool, Vec<Action>) {
    let Some(focused) = state.focused() else {
        return (false, vec![]);
    };
    if !may_edit(state, &focused) {
        tracing::debug!(author = focused.author(), user = %state.user, "edit not permitted, ignoring");
        return (false, vec![]);
    }

    let (pending, seed) = match focused {
        Focused::Item(item) => {
            let issue = item.issue().clone();
            let seed = format_issue_for_edit(&issue);
            (PendingEdit::EditIssue(issue), seed)
        }
        Focused::Comment { comment, .. } => {
            let seed = comment.body.clone();
            (PendingEdit::EditComment(comment), seed)
        }
    };
    state.pending = Some(pending);
    (false, vec![spawn_editor(&seed)])
}

fn comment(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    let Some(focused) = state.focused() else {
        return Ok((false, vec![]));
    };
    let item = focused.item().clone();

    let shown = state
        .mode
        .detail()
        .filter(|detail| detail.item.key() == item.key())
        .map(|detail| detail.comments.clone());
    let comments = match shown {
        Some(comments) => comments,
        None => state.remote.list_comments(item.issue())?,
    };

    let seed = format_issue_thread(item.issue(), &comments);
    state.pending = Some(PendingEdit::Comment(item));
    Ok((false, vec![spawn_editor(&seed)]))
}

fn submit(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    match state.input_mode {
        InputMode::Search => {
            let terms: Vec<String> = state.search_query.split_whitespace().map(str::to_string).collect();
            state.input_mode = InputMode::Normal;
            state.publish(events::SEARCH, &terms)?;
            Ok((true, vec![]))
        }
        InputMode::LabelPicker => {
            let selection = state.label_picker.selection();
            state.input_mode = InputMode::Normal;
            if selection.is_empty() {
                state.publish(events::CLEAR_LABEL_FILTERS, &[])?;
            } else {
                state.publish(events::FILTER_BY_LABELS, &selection)?;
            }
            Ok((true, vec![]))
        }
        InputMode::Normal => Ok((false, vec![])),
    }
}

fn cancel(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    match state.input_mode {
        InputMode::Search => {
            state.input_mode = InputMode::Normal;
            state.search_query.clear();
            if !state.view.search().is_empty() {
                state.publish(events::SEARCH, &[])?;
            }
            Ok((true, vec![]))
        }
        InputMode::LabelPicker => {
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }
        InputMode::Normal => Ok((false, vec![])),
    }
}

fn editor_closed(state: &mut AppState, text: Option<&str>) -> Result<(bool, Vec<Action>)> {
    let Some(pending) = state.pending.take() else {
        tracing::debug!("editor closed without a pending flow");
        return Ok((false, vec![]));
    };
    let Some(text) = text.map(strip_comments) else {
        tracing::debug!(?pending, "editor cancelled");
        return Ok((true, vec![]));
    };

    match pending {
        PendingEdit::NewIssue => {
            let (title, body) = parse_title_and_body(&text);
            if title.is_empty() {
                tracing::debug!("empty title, aborting new issue");
                return Ok((true, vec![]));
            }
            let issue = state.remote.create_issue(&title, &body)?;
            tracing::info!(number = issue.number, "issue created");
            state.view.add_created(issue.clone())?;
            state.enter_detail(Item::Issue(issue))?;
        }
        PendingEdit::EditIssue(issue) => {
            let (title, body) = parse_title_and_body(&text);
            if title.is_empty() {
                tracing::debug!(number = issue.number, "empty title, aborting edit");
                return Ok((true, vec![]));
            }
            let updated = state.remote.edit_issue(&issue, &title, &body)?;
            tracing::info!(number = updated.number, "issue edited");
            state.view.replace_issue(&updated);
            state.replace_detail_issue(&updated);
        }
        PendingEdit::EditComment(comment) => {
            if text.is_empty() {
                tracing::debug!(id = comment.id, "empty comment, aborting edit");
                return Ok((true, vec![]));
            }
            let updated = state.remote.edit_comment(&comment, &text)?;
            tracing::info!(id = updated.id, "comment edited");
            if let Mode::IssueDetail(detail) | Mode::PrDetail(detail) = &mut state.mode {
                for shown in detail.comments.iter_mut().filter(|shown| shown.id == updated.id) {
                    *shown = updated.clone();
                }
            }
        }
        PendingEdit::Comment(item) => {
            if text.is_empty() {
                tracing::debug!(number = item.number(), "empty comment, aborting");
                return Ok((true, vec![]));
            }
            let created = state.remote.create_comment(item.issue(), &text)?;
            tracing::info!(number = item.number(), id = created.id, "comment created");
            state.enter_detail(item)?;
        }
    }
    Ok((true, vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Issue, IssueState, Label, PullRequest};
    use crate::remote::{InMemoryRemote, Repository};
    use crate::ui::Theme;
    use std::sync::Arc;

    fn setup() -> (Arc<InMemoryRemote>, AppState) {
        let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
        remote.add_issue(Issue::new(1, "Crash", "bob").with_labels(vec![Label::new("bug", "f00")]));
        remote.add_issue(Issue::new(2, "Docs", "alice"));
        remote.add_pull_request(PullRequest::new(3, "Add cache", "carol"), Issue::new(3, "Add cache", "carol"));
        remote.set_diff(3, "@@ -1 +1 @@\n-a\n+b");
        remote.add_label(Label::new("bug", "f00"));
        remote.add_label(Label::new("docs", "0f0"));

        let mut state =
            AppState::new(remote.clone(), Repository::new("acme", "widgets"), "alice", Theme::default()).unwrap();
        handle_event(&mut state, &Event::ShowOpenIssues).unwrap();
        (remote, state)
    }

    #[test]
    fn diff_and_back_walk_the_mode_stack() {
        let (_, mut state) = setup();
        handle_event(&mut state, &Event::ShowPullRequests).unwrap();
        handle_event(&mut state, &Event::Detail).unwrap();
        assert!(matches!(state.mode, Mode::PrDetail(_)));

        handle_event(&mut state, &Event::Diff).unwrap();
        assert!(matches!(state.mode, Mode::PrDiff { .. }));

        handle_event(&mut state, &Event::KeyDown).unwrap();
        handle_event(&mut state, &Event::PageDown).unwrap();
        assert!(matches!(state.mode, Mode::PrDiff { scroll: 2, .. }));

        handle_event(&mut state, &Event::Back).unwrap();
        assert!(matches!(state.mode, Mode::PrDetail(_)));
        handle_event(&mut state, &Event::Back).unwrap();
        assert_eq!(state.mode, Mode::IssueList);
        assert_eq!(handle_event(&mut state, &Event::Back).unwrap(), (false, vec![]));
    }

    #[test]
    fn diff_is_ignored_outside_pull_request_detail() {
        let (remote, mut state) = setup();
        handle_event(&mut state, &Event::Detail).unwrap();
        assert!(matches!(state.mode, Mode::IssueDetail(_)));

        assert_eq!(handle_event(&mut state, &Event::Diff).unwrap(), (false, vec![]));
        assert_eq!(remote.calls("diff"), 0);
    }

    #[test]
    fn close_keeps_detail_in_sync() {
        let (remote, mut state) = setup();
        handle_event(&mut state, &Event::Detail).unwrap();
        handle_event(&mut state, &Event::CloseIssue).unwrap();

        assert_eq!(remote.issue(1).unwrap().state, IssueState::Closed);
        let detail = state.mode.detail().unwrap();
        assert!(detail.item.issue().is_closed());

        handle_event(&mut state, &Event::CloseIssue).unwrap();
        assert_eq!(remote.calls("close"), 1);

        handle_event(&mut state, &Event::ReopenIssue).unwrap();
        assert!(state.mode.detail().unwrap().item.issue().is_open());
    }

    #[test]
    fn pull_requests_are_not_closed() {
        let (remote, mut state) = setup();
        handle_event(&mut state, &Event::ShowPullRequests).unwrap();
        handle_event(&mut state, &Event::CloseIssue).unwrap();
        assert_eq!(remote.calls("close"), 0);
    }

    #[test]
    fn browser_opens_the_focused_url() {
        let (_, mut state) = setup();
        let (_, actions) = handle_event(&mut state, &Event::OpenInBrowser).unwrap();
        assert_eq!(actions, vec![Action::OpenUrl("https://github.com/acme/widgets/issues/1".into())]);
    }

    #[test]
    fn label_picker_publishes_the_selection() {
        let (_, mut state) = setup();
        handle_event(&mut state, &Event::OpenLabelPicker).unwrap();
        assert_eq!(state.input_mode, InputMode::LabelPicker);

        handle_event(&mut state, &Event::ToggleLabel).unwrap();
        handle_event(&mut state, &Event::Submit).unwrap();
        assert_eq!(state.view.labels(), ["bug".to_string()]);
        assert_eq!(state.view.items().len(), 1);

        handle_event(&mut state, &Event::OpenLabelPicker).unwrap();
        handle_event(&mut state, &Event::ToggleLabel).unwrap();
        handle_event(&mut state, &Event::Submit).unwrap();
        assert!(state.view.labels().is_empty());
        assert_eq!(state.view.items().len(), 2);
    }

    #[test]
    fn search_applies_on_submit_and_clears_on_cancel() {
        let (_, mut state) = setup();
        handle_event(&mut state, &Event::SearchMode).unwrap();
        for c in "docs".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        assert_eq!(state.view.items().len(), 2);

        handle_event(&mut state, &Event::Submit).unwrap();
        assert_eq!(state.view.search(), "docs");
        assert_eq!(state.view.items().len(), 1);

        handle_event(&mut state, &Event::SearchMode).unwrap();
        assert_eq!(state.search_query, "docs");
        handle_event(&mut state, &Event::Cancel).unwrap();
        assert_eq!(state.view.search(), "");
        assert_eq!(state.view.items().len(), 2);
    }

    #[test]
    fn new_issue_with_empty_title_is_dropped() {
        let (remote, mut state) = setup();
        let (_, actions) = handle_event(&mut state, &Event::OpenIssue).unwrap();
        assert!(matches!(&actions[..], [Action::SpawnEditor { seed }] if seed == NEW_ISSUE_TEMPLATE));

        handle_event(&mut state, &Event::EditorClosed(Some(NEW_ISSUE_TEMPLATE.to_string()))).unwrap();
        assert_eq!(remote.calls("create_issue"), 0);
        assert!(state.pending.is_none());
        assert_eq!(state.mode, Mode::IssueList);
    }
}
