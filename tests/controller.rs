use issuedeck::app::{handle_with_editor, Editor, InputMode, Mode, NoSuspend, Partition, TerminalSuspend};
use issuedeck::domain::{Issue, IssueState, Item, PullRequest};
use issuedeck::remote::{InMemoryRemote, Repository};
use issuedeck::{handle_event, initialize, Action, AppState, Config, Event, IssueDeckError, Result};
use std::collections::VecDeque;
use std::sync::Arc;

/// Answers editor requests from a script and records the seeds it was given.
#[derive(Default)]
struct ScriptedEditor {
    replies: VecDeque<Result<Option<String>>>,
    seeds: Vec<String>,
}

impl ScriptedEditor {
    fn replying(reply: &str) -> Self {
        Self {
            replies: VecDeque::from([Ok(Some(reply.to_string()))]),
            seeds: Vec::new(),
        }
    }
}

impl Editor for ScriptedEditor {
    fn edit(&mut self, seed: &str, _display: &mut dyn TerminalSuspend) -> Result<Option<String>> {
        self.seeds.push(seed.to_string());
        self.replies.pop_front().unwrap_or(Ok(None))
    }
}

fn setup() -> (Arc<InMemoryRemote>, AppState) {
    let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
    remote.add_issue(Issue::new(1, "Crash on start", "bob"));
    remote.add_issue(Issue::new(2, "Typo in docs", "alice").with_body("teh"));
    remote.add_pull_request(PullRequest::new(3, "Speed up startup", "bob"), Issue::new(3, "Speed up startup", "bob"));

    let config = Config {
        parallel_bootstrap: false,
        ..Config::default()
    };
    let state = initialize(&config, remote.clone(), Repository::new("acme", "widgets"), "alice").unwrap();
    (remote, state)
}

fn send(state: &mut AppState, editor: &mut ScriptedEditor, event: Event) -> (bool, Vec<Action>) {
    handle_with_editor(state, &event, editor, &mut NoSuspend).unwrap()
}

#[test]
fn new_issue_is_parsed_created_and_shown() {
    let (remote, mut state) = setup();
    let mut editor = ScriptedEditor::replying("Fix bug\n\nSteps to reproduce");

    send(&mut state, &mut editor, Event::OpenIssue);

    let Mode::IssueDetail(detail) = &state.mode else {
        panic!("expected issue detail, got {:?}", state.mode);
    };
    let created = remote.issue(detail.item.number()).unwrap();
    assert_eq!(created.title, "Fix bug");
    assert_eq!(created.body, "Steps to reproduce");
    assert!(editor.seeds[0].contains("<!---"));
    assert!(state.view.items().iter().any(|item| item.number() == created.number));
    assert_eq!(state.pending, None);
}

#[test]
fn cancelled_editor_creates_nothing() {
    let (remote, mut state) = setup();
    let mut editor = ScriptedEditor::default();

    send(&mut state, &mut editor, Event::OpenIssue);

    assert_eq!(editor.seeds.len(), 1);
    assert_eq!(remote.calls("create_issue"), 0);
    assert_eq!(state.mode, Mode::IssueList);
    assert_eq!(state.pending, None);
}

#[test]
fn comment_is_submitted_without_hidden_blocks() {
    let (remote, mut state) = setup();
    remote.add_comment(1, "bob", "Still happens on 1.2");
    let mut editor = ScriptedEditor::replying("<!-- hidden --> Visible line");

    send(&mut state, &mut editor, Event::Detail);
    send(&mut state, &mut editor, Event::Comment);

    let comments = remote.comments_of(1);
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].body, "Visible line");
    assert!(editor.seeds[0].contains("    Still happens on 1.2"));

    let Mode::IssueDetail(detail) = &state.mode else {
        panic!("expected issue detail, got {:?}", state.mode);
    };
    assert_eq!(detail.comments.len(), 2);
}

#[test]
fn empty_comment_is_dropped_silently() {
    let (remote, mut state) = setup();
    let mut editor = ScriptedEditor::replying("<!-- only the thread -->");

    send(&mut state, &mut editor, Event::Detail);
    send(&mut state, &mut editor, Event::Comment);

    assert_eq!(remote.calls("create_comment"), 0);
    assert_eq!(state.notice, None);
}

#[test]
fn edit_by_someone_else_never_opens_the_editor() {
    let (remote, mut state) = setup();
    let mut editor = ScriptedEditor::replying("Hijacked");

    send(&mut state, &mut editor, Event::Detail);
    let before = state.mode.clone();
    let (render, actions) = send(&mut state, &mut editor, Event::Edit);

    assert!(!render);
    assert!(actions.is_empty());
    assert!(editor.seeds.is_empty());
    assert_eq!(state.mode, before);
    assert_eq!(remote.calls("edit_issue"), 0);
}

#[test]
fn author_can_edit_title_and_body() {
    let (remote, mut state) = setup();
    let mut editor = ScriptedEditor::replying("Typo in README\nthe");

    send(&mut state, &mut editor, Event::KeyDown);
    send(&mut state, &mut editor, Event::Detail);
    send(&mut state, &mut editor, Event::Edit);

    assert_eq!(editor.seeds, vec!["Typo in docs\nteh".to_string()]);
    let edited = remote.issue(2).unwrap();
    assert_eq!((edited.title.as_str(), edited.body.as_str()), ("Typo in README", "the"));
    assert!(state
        .view
        .items()
        .iter()
        .any(|item| item.number() == 2 && item.title() == "Typo in README"));
}

#[test]
fn owner_can_edit_any_comment() {
    let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "acme"));
    remote.add_issue(Issue::new(1, "Crash on start", "bob"));
    let comment = remote.add_comment(1, "bob", "first draft");
    let mut state = initialize(&Config::default(), remote.clone(), Repository::new("acme", "widgets"), "acme").unwrap();
    let mut editor = ScriptedEditor::replying("second draft");

    send(&mut state, &mut editor, Event::Detail);
    send(&mut state, &mut editor, Event::KeyDown);
    send(&mut state, &mut editor, Event::Edit);

    assert_eq!(editor.seeds, vec!["first draft".to_string()]);
    assert_eq!(remote.comments_of(1)[0].body, "second draft");
    let Mode::IssueDetail(detail) = &state.mode else {
        panic!("expected issue detail, got {:?}", state.mode);
    };
    assert_eq!(detail.comments[0].id, comment.id);
    assert_eq!(detail.comments[0].body, "second draft");
}

#[test]
fn back_returns_through_each_view() {
    let (remote, mut state) = setup();
    remote.set_diff(3, "@@ -1 +1 @@\n-old\n+new");

    handle_event(&mut state, &Event::ShowPullRequests).unwrap();
    handle_event(&mut state, &Event::Detail).unwrap();
    assert!(matches!(state.mode, Mode::PrDetail(_)));

    handle_event(&mut state, &Event::Diff).unwrap();
    assert!(matches!(state.mode, Mode::PrDiff { .. }));

    assert_eq!(handle_event(&mut state, &Event::Back).unwrap(), (true, vec![]));
    assert!(matches!(state.mode, Mode::PrDetail(_)));
    assert_eq!(handle_event(&mut state, &Event::Back).unwrap(), (true, vec![]));
    assert_eq!(state.mode, Mode::IssueList);
    assert_eq!(handle_event(&mut state, &Event::Back).unwrap(), (false, vec![]));
}

#[test]
fn closing_a_pull_request_does_nothing() {
    let (remote, mut state) = setup();

    handle_event(&mut state, &Event::ShowPullRequests).unwrap();
    handle_event(&mut state, &Event::CloseIssue).unwrap();

    assert_eq!(remote.calls("close"), 0);
    assert_eq!(remote.issue(3).unwrap().state, IssueState::Open);
}

#[test]
fn remote_failure_becomes_a_notice_and_keeps_the_view() {
    let (remote, mut state) = setup();
    remote.fail("list_comments");

    let (render, actions) = handle_event(&mut state, &Event::Detail).unwrap();

    assert!(render);
    assert!(actions.is_empty());
    assert_eq!(state.mode, Mode::IssueList);
    assert!(state.notice.as_deref().is_some_and(|notice| notice.contains("list_comments")));

    handle_event(&mut state, &Event::KeyDown).unwrap();
    assert_eq!(state.notice, None);
}

#[test]
fn editor_failure_clears_the_pending_flow() {
    let (remote, mut state) = setup();
    let mut editor = ScriptedEditor {
        replies: VecDeque::from([Err(IssueDeckError::Editor("no such editor".to_string()))]),
        seeds: Vec::new(),
    };

    let (render, actions) = send(&mut state, &mut editor, Event::OpenIssue);

    assert!(render);
    assert!(actions.is_empty());
    assert_eq!(state.pending, None);
    assert!(state.notice.as_deref().is_some_and(|notice| notice.contains("no such editor")));
    assert_eq!(remote.calls("create_issue"), 0);
}

#[test]
fn unknown_bus_event_is_an_error() {
    let (_, mut state) = setup();
    let err = state.publish("show_everything", &[]).unwrap_err();
    assert!(matches!(err, IssueDeckError::UnknownEvent(name) if name == "show_everything"));
}

#[test]
fn search_typing_does_not_filter_until_submit() {
    let (_, mut state) = setup();

    handle_event(&mut state, &Event::SearchMode).unwrap();
    assert_eq!(state.input_mode, InputMode::Search);
    for c in "typo".chars() {
        handle_event(&mut state, &Event::Char(c)).unwrap();
    }
    assert_eq!(state.view.items().len(), 2);

    handle_event(&mut state, &Event::Submit).unwrap();
    assert_eq!(state.input_mode, InputMode::Normal);
    let shown: Vec<u64> = state.view.items().iter().map(Item::number).collect();
    assert_eq!(shown, vec![2]);
}

#[test]
fn quit_is_returned_as_an_action() {
    let (_, mut state) = setup();
    assert_eq!(handle_event(&mut state, &Event::Quit).unwrap(), (false, vec![Action::Quit]));
}

#[test]
fn failed_show_keeps_the_previous_view() {
    let (remote, mut state) = setup();
    handle_event(&mut state, &Event::Detail).unwrap();
    let detail = state.mode.clone();
    remote.fail("list_issues");

    let (render, _) = handle_event(&mut state, &Event::ShowClosedIssues).unwrap();

    assert!(render);
    assert!(state.notice.as_deref().is_some_and(|notice| notice.contains("list_issues")));
    assert_eq!(state.mode, detail);
    assert_eq!(state.view.partition(), Partition::OpenIssues);
    let shown: Vec<u64> = state.view.items().iter().map(Item::number).collect();
    assert_eq!(shown, vec![1, 2]);
}

#[test]
fn failed_label_lookup_keeps_the_detail_view() {
    let (remote, mut state) = setup();
    handle_event(&mut state, &Event::Detail).unwrap();
    let detail = state.mode.clone();
    remote.fail("list_labels");

    handle_event(&mut state, &Event::OpenLabelPicker).unwrap();

    assert_eq!(state.mode, detail);
    assert_eq!(state.input_mode, InputMode::Normal);
    assert!(state.notice.is_some());
}

#[test]
fn editing_a_pull_request_retitles_list_and_detail() {
    let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
    remote.add_pull_request(
        PullRequest::new(4, "Old PR title", "alice"),
        Issue::new(4, "Old PR title", "alice").with_body("body"),
    );
    let mut state = initialize(&Config::default(), remote.clone(), Repository::new("acme", "widgets"), "alice").unwrap();
    let mut editor = ScriptedEditor::replying("New PR title\nbody");

    send(&mut state, &mut editor, Event::ShowPullRequests);
    send(&mut state, &mut editor, Event::Detail);
    send(&mut state, &mut editor, Event::Edit);

    assert_eq!(remote.issue(4).unwrap().title, "New PR title");
    let Mode::PrDetail(detail) = &state.mode else {
        panic!("expected pull request detail, got {:?}", state.mode);
    };
    assert_eq!(detail.item.title(), "New PR title");
    assert_eq!(state.view.items()[0].title(), "New PR title");

    send(&mut state, &mut editor, Event::Refresh);
    assert_eq!(state.view.items()[0].title(), "New PR title");
}
