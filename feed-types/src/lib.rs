//! # feed-types
//!
//! Event types for the holdback feed buffer.
//!
//! This crate provides the foundational types used across all holdback crates:
//! - [`EventId`], [`Timestamp`] - Identity and ordering types
//! - [`FeedEvent`] - A single feed event as delivered by a relay
//! - [`FeedError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod event;
mod ids;

pub use error::FeedError;
pub use event::{FeedEvent, DEFAULT_KIND};
pub use ids::{EventId, Timestamp};
