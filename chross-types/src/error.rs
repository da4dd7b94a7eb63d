//! Error types for Chross wire handling.

use thiserror::Error;

/// Errors that can occur while encoding or decoding wire data.
#[derive(Debug, Error)]
pub enum WireError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization of an event payload failed
    #[error("deserialization of {event} failed: {source}")]
    Deserialization {
        /// Event name whose payload was malformed
        event: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Event name that is not part of the protocol
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Game key with an empty or non URL-safe value
    #[error("invalid game key: {0:?}")]
    InvalidGameKey(String),

    /// Action id that is not a UUID
    #[error("invalid action id: {0:?}")]
    InvalidActionId(String),

    /// Pole name other than north, south or out
    #[error("invalid pole: {0:?}")]
    InvalidPole(String),
}
