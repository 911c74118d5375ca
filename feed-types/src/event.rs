//! Feed events as delivered by relays.
//!
//! Feeds are recorded as JSON lines, one event per line. Only `id` and
//! `created_at` carry meaning for ordering; everything else rides along.

use serde::{Deserialize, Serialize};

use crate::{EventId, FeedError, Timestamp};

/// Kind assumed when a line does not carry one (a plain text note).
pub const DEFAULT_KIND: u32 = 1;

fn default_kind() -> u32 {
    DEFAULT_KIND
}

/// A single feed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Unique identifier for this event
    pub id: EventId,
    /// Author public key (hex, opaque)
    pub pubkey: String,
    /// Author-claimed creation time
    pub created_at: Timestamp,
    /// Event kind
    #[serde(default = "default_kind")]
    pub kind: u32,
    /// Event body
    #[serde(default)]
    pub content: String,
}

impl FeedEvent {
    /// Create a new text note event.
    pub fn new(
        id: EventId,
        pubkey: impl Into<String>,
        created_at: Timestamp,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            pubkey: pubkey.into(),
            created_at,
            kind: DEFAULT_KIND,
            content: content.into(),
        }
    }

    /// Decode one line of a JSON-lines feed.
    pub fn from_json_line(line: &str) -> Result<Self, FeedError> {
        serde_json::from_str(line.trim()).map_err(FeedError::Deserialization)
    }

    /// Encode as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, FeedError> {
        serde_json::to_string(self).map_err(FeedError::Serialization)
    }
}
