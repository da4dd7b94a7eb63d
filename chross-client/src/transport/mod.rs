//! Transport abstraction for Chross sessions.
//!
//! A transport is a pub/sub channel client: it subscribes to one channel,
//! triggers events on it, and hands back events other clients triggered.
//!
//! # Design
//!
//! - `subscribe()` joins a channel; the transport then delivers a
//!   subscription confirmation event ([`Envelope::subscription_succeeded`])
//! - `trigger()` publishes an envelope to every *other* subscriber
//! - `recv()` takes the next pending envelope, or reports
//!   [`TransportError::Idle`] when nothing is pending
//! - `unsubscribe()` leaves the channel
//!
//! # Example
//!
//! ```ignore
//! let hub = MemoryHub::new();
//! let transport = hub.connect();
//! transport.subscribe("private-abc").await?;
//! transport.trigger(&envelope).await?;
//! let event = transport.recv().await?;
//! ```

mod hub;
mod mock;

pub use hub::{HubTransport, MemoryHub};
pub use mock::MockTransport;

use async_trait::async_trait;
use thiserror::Error;

use chross_types::Envelope;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Subscription was refused.
    #[error("subscription failed: {0}")]
    SubscribeFailed(String),

    /// Not subscribed to a channel.
    #[error("not subscribed")]
    NotSubscribed,

    /// Trigger failed.
    #[error("trigger failed: {0}")]
    TriggerFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// No event is pending.
    #[error("no pending events")]
    Idle,
}

/// Transport trait for the shared game channel.
///
/// Implementations handle the underlying pub/sub mechanism
/// (hosted channel service, in-memory hub, mock).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Subscribe to a channel by name.
    async fn subscribe(&self, channel: &str) -> Result<(), TransportError>;

    /// Publish an event to the other subscribers of the channel.
    async fn trigger(&self, envelope: &Envelope) -> Result<(), TransportError>;

    /// Take the next pending event.
    ///
    /// Returns [`TransportError::Idle`] when nothing is pending.
    async fn recv(&self) -> Result<Envelope, TransportError>;

    /// Check if currently subscribed.
    fn is_subscribed(&self) -> bool;

    /// Leave the channel. Pending events are dropped.
    async fn unsubscribe(&self) -> Result<(), TransportError>;
}
