//! The displayed list and the logic that derives it.
//!
//! [`ViewModel`] owns both sources and the filter chain. Every show operation
//! re-derives the list from the source cache:
//!
//! ```text
//! source partition → [labels, participation, search] → dedup by identity → items
//! ```
//!
//! Toggling a filter never narrows the already-filtered list in place; it
//! re-runs the show operation for the current partition.

use super::modes::Partition;
use crate::domain::error::Result;
use crate::domain::{Issue, IssueState, Item, ItemKey};
use crate::filter::{compose, Filter, Participation};
use crate::remote::RemoteService;
use crate::source::{IssueSource, PullRequestSource, Source};
use std::collections::HashSet;
use std::sync::Arc;

/// Change observer, called once per recompute or removal.
pub type Observer = Box<dyn FnMut(&[Item], Partition) + Send>;

/// Sources, filter chain and the currently displayed items.
pub struct ViewModel {
    issues: IssueSource,
    pulls: PullRequestSource,
    remote: Arc<dyn RemoteService>,
    user: String,
    labels: Vec<String>,
    participation: Participation,
    search: String,
    partition: Partition,
    items: Vec<Item>,
    selected: usize,
    observer: Option<Observer>,
    changes: u64,
}

impl ViewModel {
    /// Creates an empty view over `remote` for `user`.
    ///
    /// Nothing is fetched until the first show operation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use issuedeck::app::ViewModel;
    /// use issuedeck::domain::Issue;
    /// use issuedeck::remote::InMemoryRemote;
    /// use std::sync::Arc;
    ///
    /// let remote = Arc::new(InMemoryRemote::new("acme", "widgets", "alice"));
    /// remote.add_issue(Issue::new(1, "Crash", "bob"));
    ///
    /// let mut view = ViewModel::new(remote, "alice");
    /// view.show_open_issues()?;
    /// assert_eq!(view.items().len(), 1);
    /// # Ok::<(), issuedeck::IssueDeckError>(())
    /// ```
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>, user: impl Into<String>) -> Self {
        Self {
            issues: IssueSource::new(remote.clone()),
            pulls: PullRequestSource::new(remote.clone()),
            remote,
            user: user.into(),
            labels: Vec::new(),
            participation: Participation::All,
            search: String::new(),
            partition: Partition::OpenIssues,
            items: Vec::new(),
            selected: 0,
            observer: None,
            changes: 0,
        }
    }

    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    #[must_use]
    pub const fn issues(&self) -> &IssueSource {
        &self.issues
    }

    #[must_use]
    pub const fn pulls(&self) -> &PullRequestSource {
        &self.pulls
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.partition
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub const fn participation(&self) -> Participation {
        self.participation
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Number of notifications sent so far.
    #[must_use]
    pub const fn changes(&self) -> u64 {
        self.changes
    }

    /// # Errors
    ///
    /// Propagates remote errors from bootstrapping or from the mentions stage.
    pub fn show_open_issues(&mut self) -> Result<()> {
        self.show(Partition::OpenIssues)
    }

    /// # Errors
    ///
    /// Propagates remote errors from bootstrapping or from the mentions stage.
    pub fn show_closed_issues(&mut self) -> Result<()> {
        self.show(Partition::ClosedIssues)
    }

    /// # Errors
    ///
    /// Propagates remote errors from bootstrapping or from the mentions stage.
    pub fn show_pull_requests(&mut self) -> Result<()> {
        self.show(Partition::PullRequests)
    }

    /// Re-runs the show operation of the current partition.
    ///
    /// # Errors
    ///
    /// Propagates remote errors from bootstrapping or from the mentions stage.
    pub fn refresh(&mut self) -> Result<()> {
        self.show(self.partition)
    }

    fn show(&mut self, partition: Partition) -> Result<()> {
        let chain = self.chain(&self.labels, self.participation, &self.search);
        let items = self.derive(partition, &chain)?;
        self.commit(partition, items);
        Ok(())
    }

    /// Runs the partition through `chain` without touching the shown list.
    fn derive(&self, partition: Partition, chain: &[Filter]) -> Result<Vec<Item>> {
        let _span = tracing::debug_span!("show",
            partition = ?partition,
            labels = self.labels.len(),
            participation = ?self.participation,
            query_len = self.search.len()
        )
        .entered();

        let candidates: Vec<Item> = match partition {
            Partition::OpenIssues => self.issues.iter_open()?.into_iter().map(Item::from).collect(),
            Partition::ClosedIssues => self.issues.iter_closed()?.into_iter().map(Item::from).collect(),
            Partition::PullRequests => self.pulls.iter()?.into_iter().map(Item::from).collect(),
        };

        let passed = compose(chain, self.remote.as_ref())(candidates)?;

        let mut seen: HashSet<ItemKey> = HashSet::with_capacity(passed.len());
        Ok(passed.into_iter().filter(|item| seen.insert(item.key())).collect())
    }

    fn commit(&mut self, partition: Partition, items: Vec<Item>) {
        self.partition = partition;
        self.items = items;
        self.clamp_selection();
        tracing::debug!(shown = self.items.len(), "list recomputed");
        self.notify();
    }

    fn chain(&self, labels: &[String], participation: Participation, search: &str) -> [Filter; 3] {
        [
            Filter::Labels(labels.to_vec()),
            participation.to_filter(&self.user),
            Filter::Title(search.to_string()),
        ]
    }

    /// Replaces the label stage and recomputes.
    ///
    /// # Errors
    ///
    /// Propagates errors from the recompute; the previous stage and list are kept.
    pub fn set_label_filter(&mut self, labels: Vec<String>) -> Result<()> {
        let chain = self.chain(&labels, self.participation, &self.search);
        let items = self.derive(self.partition, &chain)?;
        self.labels = labels;
        self.commit(self.partition, items);
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates errors from the recompute.
    pub fn clear_label_filters(&mut self) -> Result<()> {
        self.set_label_filter(Vec::new())
    }

    /// Replaces the participation stage and recomputes.
    ///
    /// # Errors
    ///
    /// Propagates errors from the recompute; the previous stage and list are kept.
    pub fn set_participation_filter(&mut self, participation: Participation) -> Result<()> {
        let chain = self.chain(&self.labels, participation, &self.search);
        let items = self.derive(self.partition, &chain)?;
        self.participation = participation;
        self.commit(self.partition, items);
        Ok(())
    }

    /// Replaces the title search stage and recomputes.
    ///
    /// # Errors
    ///
    /// Propagates errors from the recompute; the previous stage and list are kept.
    pub fn set_search(&mut self, query: impl Into<String>) -> Result<()> {
        let query = query.into();
        let chain = self.chain(&self.labels, self.participation, &query);
        let items = self.derive(self.partition, &chain)?;
        self.search = query;
        self.commit(self.partition, items);
        Ok(())
    }

    /// Closes `issue` on the remote service.
    ///
    /// On success the cache is updated, and the issue is removed from the list
    /// when the list shows open issues. In any other partition the list stays
    /// as it is until the next refresh.
    ///
    /// # Errors
    ///
    /// Propagates the remote error; nothing changes locally in that case.
    pub fn close(&mut self, issue: &Issue) -> Result<Issue> {
        let updated = self.remote.close(issue)?;
        tracing::info!(number = issue.number, "issue closed");
        self.apply_state_change(&updated);
        Ok(updated)
    }

    /// Reopens `issue`; the counterpart of [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Propagates the remote error; nothing changes locally in that case.
    pub fn reopen(&mut self, issue: &Issue) -> Result<Issue> {
        let updated = self.remote.reopen(issue)?;
        tracing::info!(number = issue.number, "issue reopened");
        self.apply_state_change(&updated);
        Ok(updated)
    }

    fn apply_state_change(&mut self, updated: &Issue) {
        self.cache(updated);

        let shown_state = match self.partition {
            Partition::OpenIssues => IssueState::Open,
            Partition::ClosedIssues => IssueState::Closed,
            Partition::PullRequests => return,
        };
        if updated.state == shown_state {
            return;
        }

        let key = Item::from(updated.clone()).key();
        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        if self.items.len() != before {
            self.clamp_selection();
            self.notify();
        }
    }

    /// Caches a newly created issue and recomputes the list.
    ///
    /// # Errors
    ///
    /// Propagates errors from the recompute.
    pub fn add_created(&mut self, issue: Issue) -> Result<()> {
        self.issues.update_issue(issue);
        self.refresh()
    }

    /// Replaces every cached and displayed snapshot of `issue` in place,
    /// keeping list positions.
    pub fn replace_issue(&mut self, issue: &Issue) {
        self.cache(issue);

        let mut replaced = false;
        for item in &mut self.items {
            match item {
                Item::Issue(shown) if shown.number == issue.number => {
                    *shown = issue.clone();
                    replaced = true;
                }
                Item::PullRequest(shown) if shown.issue.number == issue.number => {
                    shown.replace_issue(issue.clone());
                    replaced = true;
                }
                _ => {}
            }
        }
        if replaced {
            self.notify();
        }
    }

    fn cache(&self, issue: &Issue) {
        if !self.pulls.update_issue(issue) {
            self.issues.update_issue(issue.clone());
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn move_selection_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.items.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// The item under the cursor.
    #[must_use]
    pub fn focused_item(&self) -> Option<&Item> {
        self.items.get(self.selected)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn notify(&mut self) {
        self.changes += 1;
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.items, self.partition);
        }
    }
}

impl std::fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModel")
            .field("partition", &self.partition)
            .field("labels", &self.labels)
            .field("participation", &self.participation)
            .field("search", &self.search)
            .field("items", &self.items.len())
            .field("selected", &self.selected)
            .field("changes", &self.changes)
            .finish_non_exhaustive()
    }
}
