//! Error types for holdback feeds.

use thiserror::Error;

/// Errors that can occur while decoding feed events.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Event id was not valid hex
    #[error("invalid event id: {0}")]
    InvalidId(#[source] hex::FromHexError),

    /// Event id decoded to the wrong number of bytes
    #[error("invalid event id length: expected 32 bytes, got {0}")]
    InvalidIdLength(usize),

    /// JSON decoding failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// JSON encoding failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}
