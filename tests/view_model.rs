use issuedeck::app::{Partition, ViewModel};
use issuedeck::domain::{Issue, IssueState, Item, Label, PullRequest};
use issuedeck::events::{self, EventBus};
use issuedeck::remote::InMemoryRemote;
use issuedeck::source::{bootstrap_all, Source};
use std::sync::Arc;

fn remote() -> Arc<InMemoryRemote> {
    let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
    remote.add_issue(Issue::new(1, "Crash on start", "bob").with_labels(vec![Label::new("bug", "d73a4a")]));
    remote.add_issue(Issue::new(2, "Typo in docs", "alice").with_body("ping @alice please"));
    remote.add_issue(Issue::new(3, "Old report", "carol").with_state(IssueState::Closed));
    remote.add_pull_request(PullRequest::new(4, "Speed up startup", "bob"), Issue::new(4, "Speed up startup", "bob"));
    remote
}

fn numbers(view: &ViewModel) -> Vec<u64> {
    view.items().iter().map(Item::number).collect()
}

fn sorted_numbers(view: &ViewModel) -> Vec<u64> {
    let mut numbers = numbers(view);
    numbers.sort_unstable();
    numbers
}

#[test]
fn showing_twice_gives_the_same_list_without_refetching() {
    let remote = remote();
    let mut view = ViewModel::new(remote.clone(), "alice");

    view.show_open_issues().unwrap();
    let first = numbers(&view);
    view.show_open_issues().unwrap();

    assert_eq!(numbers(&view), first);
    assert_eq!(first, vec![1, 2]);
    assert_eq!(remote.calls("list_issues"), 1);
}

#[test]
fn closing_from_the_open_list_removes_the_issue() {
    let mut view = ViewModel::new(remote(), "alice");
    view.show_open_issues().unwrap();

    let issue = view.items()[0].issue().clone();
    let closed = view.close(&issue).unwrap();

    assert!(closed.is_closed());
    assert_eq!(numbers(&view), vec![2]);

    view.show_closed_issues().unwrap();
    assert_eq!(sorted_numbers(&view), vec![1, 3]);
}

#[test]
fn closing_from_the_closed_list_keeps_it_until_refresh() {
    let remote = remote();
    let mut view = ViewModel::new(remote.clone(), "alice");
    view.show_closed_issues().unwrap();
    let before = numbers(&view);

    let open_issue = remote.issue(2).unwrap();
    view.close(&open_issue).unwrap();
    assert_eq!(numbers(&view), before);

    view.refresh().unwrap();
    assert_eq!(sorted_numbers(&view), vec![2, 3]);
}

#[test]
fn clearing_labels_restores_the_partition() {
    let mut view = ViewModel::new(remote(), "alice");
    view.show_open_issues().unwrap();
    let unfiltered = numbers(&view);

    view.set_label_filter(vec!["bug".to_string()]).unwrap();
    assert_eq!(numbers(&view), vec![1]);

    view.set_label_filter(Vec::new()).unwrap();
    assert_eq!(numbers(&view), unfiltered);
}

#[test]
fn bus_drives_participation_and_search() {
    let mut view = ViewModel::new(remote(), "alice");
    let mut bus: EventBus<ViewModel> = EventBus::new(events::EVENTS);
    bus.register(events::SHOW_OPEN_ISSUES, Box::new(|view: &mut ViewModel, _: &[String]| view.show_open_issues()))
        .unwrap();
    bus.register(
        events::SHOW_MENTIONING_YOU,
        Box::new(|view: &mut ViewModel, _: &[String]| {
            view.set_participation_filter(issuedeck::filter::Participation::Mentions)
        }),
    )
    .unwrap();
    bus.register(events::SEARCH, Box::new(|view: &mut ViewModel, args: &[String]| view.set_search(args.join(" "))))
        .unwrap();

    bus.publish(&mut view, events::SHOW_OPEN_ISSUES, &[]).unwrap();
    bus.publish(&mut view, events::SHOW_MENTIONING_YOU, &[]).unwrap();
    assert_eq!(numbers(&view), vec![2]);

    bus.publish(&mut view, events::SEARCH, &["crash".to_string()]).unwrap();
    assert!(view.items().is_empty());

    assert!(bus.publish(&mut view, "show_everything", &[]).is_err());
}

#[test]
fn concurrent_warm_up_then_lazy_reads_fetch_once() {
    let remote = remote();
    let mut view = ViewModel::new(remote.clone(), "alice");

    assert_eq!(bootstrap_all(view.issues(), view.pulls()), 0);
    view.show_open_issues().unwrap();
    view.show_closed_issues().unwrap();
    view.show_pull_requests().unwrap();

    assert_eq!(numbers(&view), vec![4]);
    assert_eq!(remote.calls("list_issues"), 2);
    assert_eq!(remote.calls("list_pulls"), 1);
    assert_eq!(view.issues().iter_all().unwrap().len(), 3);
}

#[test]
fn failed_fetch_keeps_the_previous_list_and_stays_retryable() {
    let remote = remote();
    let mut view = ViewModel::new(remote.clone(), "alice");
    view.show_open_issues().unwrap();

    remote.fail("list_issues");
    assert!(view.show_closed_issues().unwrap_err().is_remote());
    assert_eq!(view.partition(), Partition::OpenIssues);
    assert_eq!(numbers(&view), vec![1, 2]);

    remote.recover("list_issues");
    view.show_closed_issues().unwrap();
    assert_eq!(view.partition(), Partition::ClosedIssues);
    assert_eq!(numbers(&view), vec![3]);
    assert_eq!(remote.calls("list_issues"), 3);
}

#[test]
fn failed_mentions_lookup_keeps_the_previous_filter() {
    let remote = remote();
    let mut view = ViewModel::new(remote.clone(), "alice");
    view.show_open_issues().unwrap();

    remote.fail("list_comments");
    assert!(view
        .set_participation_filter(issuedeck::filter::Participation::Mentions)
        .is_err());

    assert_eq!(view.participation(), issuedeck::filter::Participation::All);
    assert_eq!(numbers(&view), vec![1, 2]);
}
