//! Keybindings.
//!
//! Global (all input modes):
//! - `Ctrl+n` / `Down`: Move down
//! - `Ctrl+p` / `Up`: Move up
//!
//! Normal mode:
//! - `j`/`k`: Move down/up
//! - `Enter`: Open detail, `Esc`: Back
//! - `1`/`2`/`3`: Open issues, closed issues, pull requests
//! - `a`/`m`/`A`/`@`: All, created by you, assigned to you, mentioning you
//! - `l`: Label picker, `L`: Clear label filters
//! - `/`: Search titles
//! - `n`: New issue, `c`: Close, `o`: Reopen, `e`: Edit, `C`: Comment
//! - `d`: Diff, `b`: Open in browser, `r`: Refresh, `q`: Quit
//! - `Space`/`PageDown`, `PageUp`: Scroll a diff by one page
//!
//! Search mode: characters are typed, `Enter` applies, `Esc` cancels.
//!
//! Label picker: `j`/`k` move, `Space` toggles, `Enter` applies, `Esc` cancels.

use crate::app::{Event, InputMode, Mode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Translates a keypress into a controller event.
///
/// # Returns
///
/// `None` for keys without a binding in the current mode.
#[must_use]
pub fn map_key(key: KeyEvent, input_mode: InputMode, mode: &Mode) -> Option<Event> {
    tracing::trace!(code = ?key.code, modifiers = ?key.modifiers, "key event");

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') => Some(Event::KeyDown),
            KeyCode::Char('p') => Some(Event::KeyUp),
            KeyCode::Char('c') => Some(Event::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Down => return Some(Event::KeyDown),
        KeyCode::Up => return Some(Event::KeyUp),
        _ => {}
    }

    match input_mode {
        InputMode::Search => map_search_key(key.code),
        InputMode::LabelPicker => map_picker_key(key.code),
        InputMode::Normal => map_normal_key(key.code, mode),
    }
}

fn map_search_key(code: KeyCode) -> Option<Event> {
    Some(match code {
        KeyCode::Enter => Event::Submit,
        KeyCode::Esc => Event::Cancel,
        KeyCode::Backspace => Event::Backspace,
        KeyCode::Char(c) => Event::Char(c),
        _ => return None,
    })
}

fn map_picker_key(code: KeyCode) -> Option<Event> {
    Some(match code {
        KeyCode::Char('j') => Event::KeyDown,
        KeyCode::Char('k') => Event::KeyUp,
        KeyCode::Char(' ') => Event::ToggleLabel,
        KeyCode::Enter => Event::Submit,
        KeyCode::Esc | KeyCode::Char('q') => Event::Cancel,
        _ => return None,
    })
}

fn map_normal_key(code: KeyCode, mode: &Mode) -> Option<Event> {
    Some(match code {
        KeyCode::Char('j') => Event::KeyDown,
        KeyCode::Char('k') => Event::KeyUp,
        KeyCode::PageDown => Event::PageDown,
        KeyCode::PageUp => Event::PageUp,
        KeyCode::Char(' ') if matches!(mode, Mode::PrDiff { .. }) => Event::PageDown,
        KeyCode::Enter => Event::Detail,
        KeyCode::Esc | KeyCode::Backspace => Event::Back,
        KeyCode::Char('1') => Event::ShowOpenIssues,
        KeyCode::Char('2') => Event::ShowClosedIssues,
        KeyCode::Char('3') => Event::ShowPullRequests,
        KeyCode::Char('a') => Event::ShowAll,
        KeyCode::Char('m') => Event::ShowCreatedByYou,
        KeyCode::Char('A') => Event::ShowAssignedToYou,
        KeyCode::Char('@') => Event::ShowMentioningYou,
        KeyCode::Char('l') => Event::OpenLabelPicker,
        KeyCode::Char('L') => Event::ClearLabelFilters,
        KeyCode::Char('/') => Event::SearchMode,
        KeyCode::Char('n') => Event::OpenIssue,
        KeyCode::Char('c') => Event::CloseIssue,
        KeyCode::Char('o') => Event::ReopenIssue,
        KeyCode::Char('e') => Event::Edit,
        KeyCode::Char('C') => Event::Comment,
        KeyCode::Char('d') => Event::Diff,
        KeyCode::Char('b') => Event::OpenInBrowser,
        KeyCode::Char('r') => Event::Refresh,
        KeyCode::Char('q') => Event::Quit,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DetailState;
    use crate::domain::{Issue, Item};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn diff_mode() -> Mode {
        Mode::PrDiff {
            detail: DetailState::new(Item::from(Issue::new(1, "Change", "bob")), vec![]),
            diff: String::new(),
            scroll: 0,
        }
    }

    #[test]
    fn letters_are_typed_while_searching() {
        let list = Mode::IssueList;
        assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Search, &list), Some(Event::Char('q')));
        assert_eq!(map_key(key(KeyCode::Char('j')), InputMode::Search, &list), Some(Event::Char('j')));
        assert_eq!(map_key(key(KeyCode::Enter), InputMode::Search, &list), Some(Event::Submit));
        assert_eq!(map_key(key(KeyCode::Esc), InputMode::Search, &list), Some(Event::Cancel));
    }

    #[test]
    fn enter_and_escape_depend_on_input_mode() {
        let list = Mode::IssueList;
        assert_eq!(map_key(key(KeyCode::Enter), InputMode::Normal, &list), Some(Event::Detail));
        assert_eq!(map_key(key(KeyCode::Esc), InputMode::Normal, &list), Some(Event::Back));
        assert_eq!(map_key(key(KeyCode::Enter), InputMode::LabelPicker, &list), Some(Event::Submit));
        assert_eq!(map_key(key(KeyCode::Esc), InputMode::LabelPicker, &list), Some(Event::Cancel));
    }

    #[test]
    fn space_pages_only_in_a_diff() {
        assert_eq!(map_key(key(KeyCode::Char(' ')), InputMode::Normal, &diff_mode()), Some(Event::PageDown));
        assert_eq!(map_key(key(KeyCode::Char(' ')), InputMode::Normal, &Mode::IssueList), None);
        assert_eq!(
            map_key(key(KeyCode::Char(' ')), InputMode::LabelPicker, &Mode::IssueList),
            Some(Event::ToggleLabel)
        );
    }

    #[test]
    fn control_bindings_work_in_every_mode() {
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_n, InputMode::Search, &Mode::IssueList), Some(Event::KeyDown));
        assert_eq!(map_key(ctrl_n, InputMode::Normal, &Mode::IssueList), Some(Event::KeyDown));
    }

    #[test]
    fn shifted_letters_have_their_own_commands() {
        let list = Mode::IssueList;
        let shifted = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT);
        assert_eq!(map_key(shifted('C'), InputMode::Normal, &list), Some(Event::Comment));
        assert_eq!(map_key(shifted('A'), InputMode::Normal, &list), Some(Event::ShowAssignedToYou));
        assert_eq!(map_key(key(KeyCode::Char('c')), InputMode::Normal, &list), Some(Event::CloseIssue));
    }
}
