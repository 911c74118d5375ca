//! Positional insertion into an ordered, id-unique sequence.

use crate::FeedItem;

/// Insert `new` into `events` ahead of the first element it sorts before.
///
/// `sorts_before(new, existing)` decides placement; if it never returns true
/// the item is appended. Returns `false` without touching `events` when an
/// item with the same id is already present anywhere in the sequence.
pub fn insert_unique_sorted<T, F>(events: &mut Vec<T>, new: T, mut sorts_before: F) -> bool
where
    T: FeedItem,
    F: FnMut(&T, &T) -> bool,
{
    if events.iter().any(|existing| existing.id() == new.id()) {
        return false;
    }
    let position = events
        .iter()
        .position(|existing| sorts_before(&new, existing))
        .unwrap_or(events.len());
    events.insert(position, new);
    true
}

/// Insert newest-first by `created_at`; equal timestamps keep arrival order.
pub fn insert_unique_sorted_by_created<T: FeedItem>(events: &mut Vec<T>, new: T) -> bool {
    insert_unique_sorted(events, new, |a, b| a.created_at() > b.created_at())
}
