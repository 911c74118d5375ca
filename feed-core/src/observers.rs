//! Change notifications for holder consumers.
//!
//! A consumer that renders the visible sequence subscribes once and is told
//! when a flush reshaped it. Inserts never notify: a caller inserting in
//! immediate mode already knows it touched the sequence.

use std::fmt;

/// Handle returned by [`ChangeObservers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What changed in the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderChange {
    /// Pending events were merged into the visible sequence.
    Flushed {
        /// Number of events that landed in the visible sequence.
        revealed: usize,
        /// Visible sequence length after the flush.
        visible: usize,
    },
}

type Observer = Box<dyn FnMut(&HolderChange)>;

/// Registry of change callbacks.
#[derive(Default)]
pub struct ChangeObservers {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl ChangeObservers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it runs on every notification until unsubscribed.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&HolderChange) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Deliver `change` to every subscriber, in subscription order.
    pub fn notify(&mut self, change: &HolderChange) {
        for (_, observer) in self.observers.iter_mut() {
            observer(change);
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ChangeObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeObservers")
            .field("subscribers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const CHANGE: HolderChange = HolderChange::Flushed {
        revealed: 1,
        visible: 3,
    };

    #[test]
    fn notify_reaches_every_subscriber() {
        let mut observers = ChangeObservers::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        observers.subscribe(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&log);
        observers.subscribe(move |_| second.borrow_mut().push("second"));

        observers.notify(&CHANGE);

        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut observers = ChangeObservers::new();
        let hits = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&hits);
        let id = observers.subscribe(move |_| *counter.borrow_mut() += 1);

        observers.notify(&CHANGE);
        assert!(observers.unsubscribe(id));
        observers.notify(&CHANGE);

        assert_eq!(*hits.borrow(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn unsubscribe_unknown_is_false() {
        let mut observers = ChangeObservers::new();
        let id = observers.subscribe(|_| {});
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
    }

    #[test]
    fn subscription_ids_are_distinct() {
        let mut observers = ChangeObservers::new();
        let a = observers.subscribe(|_| {});
        let b = observers.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(observers.len(), 2);
    }

    #[test]
    fn subscriber_sees_change_payload() {
        let mut observers = ChangeObservers::new();
        let seen = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&seen);
        observers.subscribe(move |change| *slot.borrow_mut() = Some(*change));
        observers.notify(&CHANGE);

        assert_eq!(*seen.borrow(), Some(CHANGE));
    }
}
