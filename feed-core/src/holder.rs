//! Event holder for holdback.
//!
//! This module provides the admission buffer between a feed and a view:
//! - Deduplication by event id for the lifetime of the holder
//! - A visible sequence kept newest-first
//! - An incoming queue that holds new arrivals until the view asks for them
//!
//! In immediate mode new events go straight into the visible sequence. In
//! queued mode they wait in `incoming` so the view keeps its scroll position
//! until the user catches up with [`EventHolder::flush`].

use std::collections::HashSet;
use std::fmt;

use crate::observers::{ChangeObservers, HolderChange, SubscriptionId};
use crate::sorted::insert_unique_sorted_by_created;
use crate::FeedItem;

type OnQueue<T> = Box<dyn FnMut(&T)>;

/// Deduplicating, ordering buffer for feed events.
///
/// Events flow through the holder in this order:
/// 1. `insert()` - rejected if the id was seen before, otherwise
///    placed in the visible sequence (immediate) or in `incoming` (queued)
/// 2. `flush()` - merge `incoming` into the visible sequence
///
/// `retain()` prunes both sequences but never forgets an id: a filtered
/// event cannot come back through `insert()`.
pub struct EventHolder<T: FeedItem> {
    /// Every id admitted through `insert()`.
    has_event: HashSet<T::Id>,
    /// Visible sequence, newest first.
    events: Vec<T>,
    /// Events admitted in queued mode, in arrival order.
    incoming: Vec<T>,
    /// Route new events to `incoming` instead of `events`.
    should_queue: bool,
    /// Called for each event routed to `incoming`.
    on_queue: Option<OnQueue<T>>,
    /// Notified after a flush that changed `events`.
    observers: ChangeObservers,
}

impl<T: FeedItem> EventHolder<T> {
    /// Create an empty holder in immediate mode.
    pub fn new() -> Self {
        Self {
            has_event: HashSet::new(),
            events: Vec::new(),
            incoming: Vec::new(),
            should_queue: false,
            on_queue: None,
            observers: ChangeObservers::new(),
        }
    }

    /// Create an empty holder that calls `on_queue` for every queued event.
    pub fn with_on_queue<F>(on_queue: F) -> Self
    where
        F: FnMut(&T) + 'static,
    {
        Self {
            on_queue: Some(Box::new(on_queue)),
            ..Self::new()
        }
    }

    /// Create a holder that continues from existing sequences.
    ///
    /// `events` is taken as already ordered. Neither sequence is recorded as
    /// seen, so their ids can still be admitted by `insert()`.
    pub fn with_events(events: Vec<T>, incoming: Vec<T>) -> Self {
        Self {
            events,
            incoming,
            ..Self::new()
        }
    }

    /// Switch between immediate (`false`) and queued (`true`) admission.
    ///
    /// Already admitted events stay where they are.
    pub fn set_should_queue(&mut self, should_queue: bool) {
        self.should_queue = should_queue;
    }

    /// Whether new events are currently being queued.
    pub fn should_queue(&self) -> bool {
        self.should_queue
    }

    /// Admit an event.
    ///
    /// Returns `false` if an event with the same id was admitted before;
    /// that is a final answer, not a transient failure.
    pub fn insert(&mut self, event: T) -> bool {
        if self.has_event.contains(event.id()) {
            tracing::trace!(id = ?event.id(), "duplicate event rejected");
            return false;
        }

        self.has_event.insert(event.id().clone());

        if self.should_queue {
            if let Some(on_queue) = self.on_queue.as_mut() {
                on_queue(&event);
            }
            self.incoming.push(event);
        } else {
            insert_unique_sorted_by_created(&mut self.events, event);
        }
        true
    }

    /// Keep only events matching `keep`, in both sequences.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.events.retain(&mut keep);
        self.incoming.retain(&mut keep);
    }

    /// Merge every queued event into the visible sequence.
    ///
    /// Observers are notified once if the visible sequence changed. Returns
    /// the number of events that became visible.
    ///
    /// A queued event whose id already sits anywhere in the visible sequence
    /// is dropped rather than shown twice. Only events passed to
    /// [`EventHolder::with_events`] can cause this, since they are never
    /// recorded as seen. A twin check limited to events ahead of the
    /// insertion point would let an older seeded copy survive next to the
    /// new one.
    pub fn flush(&mut self) -> usize {
        if self.incoming.is_empty() {
            return 0;
        }

        let mut revealed = 0;
        for event in std::mem::take(&mut self.incoming) {
            if insert_unique_sorted_by_created(&mut self.events, event) {
                revealed += 1;
            }
        }

        if revealed > 0 {
            tracing::debug!(revealed, visible = self.events.len(), "flushed incoming events");
            self.observers.notify(&HolderChange::Flushed {
                revealed,
                visible: self.events.len(),
            });
        }
        revealed
    }

    /// Be told when a flush changes the visible sequence.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&HolderChange) + 'static,
    {
        self.observers.subscribe(observer)
    }

    /// Stop notifications for `id`. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// The visible sequence, newest first.
    pub fn events(&self) -> &[T] {
        &self.events
    }

    /// Queued events, in arrival order.
    pub fn incoming(&self) -> &[T] {
        &self.incoming
    }

    /// Number of queued events waiting for a flush.
    pub fn pending_count(&self) -> usize {
        self.incoming.len()
    }

    /// Number of visible events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the visible sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Check if `id` was ever admitted through `insert()`.
    pub fn has_seen(&self, id: &T::Id) -> bool {
        self.has_event.contains(id)
    }
}

impl<T: FeedItem + Clone> EventHolder<T> {
    /// Visible events followed by queued events.
    pub fn all_events(&self) -> Vec<T> {
        self.events
            .iter()
            .chain(self.incoming.iter())
            .cloned()
            .collect()
    }
}

impl<T: FeedItem> Default for EventHolder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FeedItem> fmt::Debug for EventHolder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHolder")
            .field("seen", &self.has_event.len())
            .field("visible", &self.events.len())
            .field("incoming", &self.incoming.len())
            .field("should_queue", &self.should_queue)
            .field("on_queue", &self.on_queue.is_some())
            .field("observers", &self.observers)
            .finish()
    }
}
