//! What the holder needs to know about an item.

use std::fmt::Debug;
use std::hash::Hash;

use holdback_feed_types::{EventId, FeedEvent, Timestamp};

/// An item that can be admitted to an [`EventHolder`](crate::EventHolder).
///
/// Only identity and creation time are ever inspected; the rest of the item
/// is opaque payload.
pub trait FeedItem {
    /// Identity used for deduplication.
    type Id: Clone + Eq + Hash + Debug;

    /// Stable identity of this item.
    fn id(&self) -> &Self::Id;

    /// Creation time used for ordering.
    fn created_at(&self) -> Timestamp;
}

impl FeedItem for FeedEvent {
    type Id = EventId;

    fn id(&self) -> &EventId {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
