//! Envelope - the channel framing for all protocol events.

use serde::{Deserialize, Serialize};

/// Event the transport emits once the channel subscription is authorized.
pub const SUBSCRIPTION_SUCCEEDED: &str = "pusher:subscription_succeeded";

/// One event on the shared pub/sub channel.
///
/// This is the layer the transport sees: an event name plus an opaque
/// JSON payload. Client events are named `client-{namespace}:{kind}`, so
/// several games can multiplex one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name
    pub event: String,
    /// JSON-encoded payload (empty for transport events)
    pub data: Vec<u8>,
}

impl Envelope {
    /// Create an envelope for an event and its payload.
    pub fn new(event: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// The transport's subscription confirmation.
    pub fn subscription_succeeded() -> Self {
        Self::new(SUBSCRIPTION_SUCCEEDED, Vec::new())
    }

    /// Check if this is the transport's subscription confirmation.
    pub fn is_subscription_succeeded(&self) -> bool {
        self.event == SUBSCRIPTION_SUCCEEDED
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
