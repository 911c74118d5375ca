//! # feed-core
//!
//! Pure logic for holdback (no I/O, instant tests).
//!
//! This crate implements the admission buffer that sits between a live feed
//! and a view, without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! Everything here runs on the caller's thread and returns immediately:
//! - No locking, no async, no background work
//! - Deterministic behavior (same inserts in the same order → same state)
//! - Side effects only through callbacks the caller registers
//!
//! Feeding events from several relays at once is the caller's job: marshal
//! them onto the thread that owns the [`EventHolder`] (see `feed-cli`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod holder;
pub mod item;
pub mod observers;
pub mod sorted;

pub use holder::EventHolder;
pub use item::FeedItem;
pub use observers::{ChangeObservers, HolderChange, SubscriptionId};
pub use sorted::{insert_unique_sorted, insert_unique_sorted_by_created};
