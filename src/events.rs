//! Named-event publish/subscribe registry.
//!
//! The bus decouples the list controls (partition switches, label and
//! participation filters, search) from the [`ViewModel`](crate::app::ViewModel):
//! the controller publishes by name and whatever is registered reacts.
//!
//! The set of event names is fixed when the bus is created. Registering or
//! publishing a name outside that set fails with
//! [`IssueDeckError::UnknownEvent`].
//!
//! # Example
//!
//! ```rust
//! use issuedeck::events::EventBus;
//!
//! let mut bus: EventBus<Vec<String>> = EventBus::new(&["greet"]);
//! bus.register("greet", Box::new(|log: &mut Vec<String>, args: &[String]| {
//!     log.push(args.join(" "));
//!     Ok(())
//! }))?;
//!
//! let mut log = Vec::new();
//! bus.publish(&mut log, "greet", &["hello".to_string()])?;
//! assert_eq!(log, vec!["hello"]);
//! assert!(bus.publish(&mut log, "missing", &[]).is_err());
//! # Ok::<(), issuedeck::IssueDeckError>(())
//! ```

use crate::domain::error::{IssueDeckError, Result};
use std::collections::HashMap;

pub const SHOW_OPEN_ISSUES: &str = "show_open_issues";
pub const SHOW_CLOSED_ISSUES: &str = "show_closed_issues";
pub const SHOW_PULL_REQUESTS: &str = "show_pull_requests";
pub const FILTER_BY_LABELS: &str = "filter_by_labels";
pub const CLEAR_LABEL_FILTERS: &str = "clear_label_filters";
pub const SHOW_ALL: &str = "show_all";
pub const SHOW_CREATED_BY_YOU: &str = "show_created_by_you";
pub const SHOW_ASSIGNED_TO_YOU: &str = "show_assigned_to_you";
pub const SHOW_MENTIONING_YOU: &str = "show_mentioning_you";
pub const SEARCH: &str = "search";

/// Every event the application publishes.
pub const EVENTS: &[&str] = &[
    SHOW_OPEN_ISSUES,
    SHOW_CLOSED_ISSUES,
    SHOW_PULL_REQUESTS,
    FILTER_BY_LABELS,
    CLEAR_LABEL_FILTERS,
    SHOW_ALL,
    SHOW_CREATED_BY_YOU,
    SHOW_ASSIGNED_TO_YOU,
    SHOW_MENTIONING_YOU,
    SEARCH,
];

/// Subscriber callback. Receives the context passed to
/// [`publish`](EventBus::publish) and the published arguments.
pub type Callback<Ctx> = Box<dyn FnMut(&mut Ctx, &[String]) -> Result<()> + Send>;

/// Publish/subscribe registry over a fixed set of event names.
///
/// Subscribers run synchronously on the publishing thread, in registration
/// order. The first subscriber error stops delivery and is returned.
pub struct EventBus<Ctx> {
    subscribers: HashMap<&'static str, Vec<Callback<Ctx>>>,
}

impl<Ctx> EventBus<Ctx> {
    /// Creates a bus that accepts only the names in `registry`.
    #[must_use]
    pub fn new(registry: &[&'static str]) -> Self {
        Self {
            subscribers: registry.iter().map(|name| (*name, Vec::new())).collect(),
        }
    }

    /// Appends `callback` to the subscribers of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDeckError::UnknownEvent`] if `name` is not registered.
    pub fn register(&mut self, name: &str, callback: Callback<Ctx>) -> Result<()> {
        let subscribers = self
            .subscribers
            .get_mut(name)
            .ok_or_else(|| IssueDeckError::UnknownEvent(name.to_string()))?;
        subscribers.push(callback);
        Ok(())
    }

    /// Invokes every subscriber of `name` with `ctx` and `args`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDeckError::UnknownEvent`] if `name` is not registered,
    /// or the first error a subscriber returns.
    pub fn publish(&mut self, ctx: &mut Ctx, name: &str, args: &[String]) -> Result<()> {
        let subscribers = self
            .subscribers
            .get_mut(name)
            .ok_or_else(|| IssueDeckError::UnknownEvent(name.to_string()))?;

        tracing::debug!(event = name, subscribers = subscribers.len(), ?args, "publishing");

        for callback in subscribers.iter_mut() {
            callback(ctx, args)?;
        }
        Ok(())
    }

    /// Returns `true` if `name` is part of this bus's registry.
    #[must_use]
    pub fn knows(&self, name: &str) -> bool {
        self.subscribers.contains_key(name)
    }
}

impl<Ctx> std::fmt::Debug for EventBus<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self
            .subscribers
            .iter()
            .map(|(name, subs)| (*name, subs.len()))
            .collect();
        names.sort_unstable();
        f.debug_struct("EventBus").field("subscribers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(tag: &'static str) -> Callback<Vec<String>> {
        Box::new(move |log: &mut Vec<String>, args: &[String]| {
            log.push(format!("{tag}:{}", args.join(",")));
            Ok(())
        })
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let mut bus = EventBus::new(EVENTS);
        bus.register(SHOW_ALL, recorder("first")).unwrap();
        bus.register(SHOW_ALL, recorder("second")).unwrap();

        let mut log = Vec::new();
        bus.publish(&mut log, SHOW_ALL, &["x".to_string()]).unwrap();

        assert_eq!(log, vec!["first:x", "second:x"]);
    }

    #[test]
    fn unknown_names_are_rejected_on_both_ends() {
        let mut bus: EventBus<Vec<String>> = EventBus::new(EVENTS);

        let registered = bus.register("show_everything", recorder("x"));
        assert!(matches!(registered, Err(IssueDeckError::UnknownEvent(name)) if name == "show_everything"));

        let published = bus.publish(&mut Vec::new(), "show_everything", &[]);
        assert!(matches!(published, Err(IssueDeckError::UnknownEvent(_))));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let mut bus: EventBus<Vec<String>> = EventBus::new(EVENTS);
        let mut log = Vec::new();
        bus.publish(&mut log, SEARCH, &[]).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn first_failing_subscriber_stops_delivery() {
        let mut bus = EventBus::new(&[SHOW_ALL]);
        bus.register(
            SHOW_ALL,
            Box::new(|_: &mut Vec<String>, _: &[String]| Err(IssueDeckError::Remote("down".into()))),
        )
        .unwrap();
        bus.register(SHOW_ALL, recorder("never")).unwrap();

        let mut log = Vec::new();
        let result = bus.publish(&mut log, SHOW_ALL, &[]);

        assert!(result.is_err());
        assert!(log.is_empty());
    }
}
