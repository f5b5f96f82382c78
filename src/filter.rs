//! Composable filter stages over the displayed items.
//!
//! A [`Filter`] takes a sequence of items and returns the ones that pass. The
//! chain is recomputed from scratch every time it runs; no stage keeps state
//! across runs unless it was built that way ([`Filter::Predicate`]).
//!
//! Stages compose left to right with [`compose`]. Order matters: a stage that
//! looks at its position in the sequence sees a different input depending on
//! what ran before it.
//!
//! # Example
//!
//! ```rust
//! use issuedeck::domain::{Issue, Item, Label};
//! use issuedeck::filter::{compose, Filter};
//! use issuedeck::remote::InMemoryRemote;
//!
//! let remote = InMemoryRemote::new("acme", "widgets", "alice");
//! let items: Vec<Item> = vec![
//!     Issue::new(1, "Crash", "alice").with_labels(vec![Label::new("bug", "f00")]).into(),
//!     Issue::new(2, "Docs", "bob").into(),
//! ];
//!
//! let chain = [Filter::Labels(vec!["bug".into()]), Filter::CreatedBy("alice".into())];
//! let passed = compose(&chain, &remote)(items)?;
//! assert_eq!(passed.len(), 1);
//! # Ok::<(), issuedeck::IssueDeckError>(())
//! ```

use crate::domain::error::Result;
use crate::domain::Item;
use crate::remote::RemoteService;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;
use std::sync::Arc;

/// Ad-hoc predicate stage.
pub type ItemPredicate = Arc<dyn Fn(&Item) -> bool + Send + Sync>;

/// One stage of the filter chain.
#[derive(Clone)]
pub enum Filter {
    /// Passes everything.
    NoOp,
    /// Passes items carrying any of the labels. An empty set passes everything.
    Labels(Vec<String>),
    /// Passes items opened by the user.
    CreatedBy(String),
    /// Passes items assigned to the user. Pull requests use their issue twin.
    AssignedTo(String),
    /// Passes items whose body or comments contain `"@user "`.
    ///
    /// Comments are fetched per candidate, which blocks on the remote service.
    Mentions(String),
    /// Fuzzy title match; every whitespace-separated token must match.
    Title(String),
    /// Passes items for which the predicate holds.
    Predicate(ItemPredicate),
}

impl Filter {
    /// Runs this stage over `items`.
    ///
    /// Each stage hands a materialised list to the next, so the comment
    /// lookups of [`Filter::Mentions`] only see items earlier stages kept.
    ///
    /// # Errors
    ///
    /// Only [`Filter::Mentions`] touches the remote service; its comment
    /// lookups propagate remote errors.
    pub fn apply(&self, items: Vec<Item>, remote: &dyn RemoteService) -> Result<Vec<Item>> {
        match self {
            Self::NoOp => Ok(items),
            Self::Labels(labels) if labels.is_empty() => Ok(items),
            Self::Labels(labels) => Ok(keep(items, |item| item.issue().has_any_label(labels))),
            Self::CreatedBy(user) => Ok(keep(items, |item| item.author() == user)),
            Self::AssignedTo(user) => Ok(keep(items, |item| {
                item.issue().assignee.as_deref() == Some(user.as_str())
            })),
            Self::Mentions(user) => mentioning(items, user, remote),
            Self::Title(query) => Ok(matching_title(items, query)),
            Self::Predicate(predicate) => Ok(keep(items, |item| predicate(item))),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => f.write_str("NoOp"),
            Self::Labels(labels) => f.debug_tuple("Labels").field(labels).finish(),
            Self::CreatedBy(user) => f.debug_tuple("CreatedBy").field(user).finish(),
            Self::AssignedTo(user) => f.debug_tuple("AssignedTo").field(user).finish(),
            Self::Mentions(user) => f.debug_tuple("Mentions").field(user).finish(),
            Self::Title(query) => f.debug_tuple("Title").field(query).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

fn keep(items: Vec<Item>, predicate: impl Fn(&Item) -> bool) -> Vec<Item> {
    items.into_iter().filter(|item| predicate(item)).collect()
}

fn mentioning(items: Vec<Item>, user: &str, remote: &dyn RemoteService) -> Result<Vec<Item>> {
    let token = format!("@{user} ");
    let mut passed = Vec::with_capacity(items.len());

    for item in items {
        let issue = item.issue();
        let mentioned = issue.body.contains(&token)
            || remote
                .list_comments(issue)?
                .iter()
                .any(|comment| comment.body.contains(&token));
        if mentioned {
            passed.push(item);
        }
    }

    tracing::debug!(user, passed = passed.len(), "mentions filter applied");
    Ok(passed)
}

fn matching_title(items: Vec<Item>, query: &str) -> Vec<Item> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return items;
    }

    let matcher = SkimMatcherV2::default();
    keep(items, |item| {
        let title = item.title().to_lowercase();
        tokens
            .iter()
            .all(|token| matcher.fuzzy_match(&title, token).is_some())
    })
}

/// Composes `filters` left to right into a single transform.
///
/// The empty chain is the identity.
pub fn compose<'a>(
    filters: &'a [Filter],
    remote: &'a dyn RemoteService,
) -> impl Fn(Vec<Item>) -> Result<Vec<Item>> + 'a {
    move |items| {
        filters
            .iter()
            .try_fold(items, |items, filter| filter.apply(items, remote))
    }
}

/// Which participation stage is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Participation {
    #[default]
    All,
    CreatedBy,
    AssignedTo,
    Mentions,
}

impl Participation {
    /// The filter stage for `user`.
    #[must_use]
    pub fn to_filter(self, user: &str) -> Filter {
        match self {
            Self::All => Filter::NoOp,
            Self::CreatedBy => Filter::CreatedBy(user.to_string()),
            Self::AssignedTo => Filter::AssignedTo(user.to_string()),
            Self::Mentions => Filter::Mentions(user.to_string()),
        }
    }

    /// Short label shown in the list header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::CreatedBy => "created by you",
            Self::AssignedTo => "assigned to you",
            Self::Mentions => "mentioning you",
        }
    }
}
