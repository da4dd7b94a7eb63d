//! Mock transport for testing.
//!
//! Allows queueing incoming events and capturing triggered ones for verification.

use super::{Transport, TransportError};
use async_trait::async_trait;
use chross_types::Envelope;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock transport for testing.
///
/// Allows queueing incoming events and capturing triggered ones for verification.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    subscribed: bool,
    channel: Option<String>,
    sent_events: Vec<Envelope>,
    receive_queue: VecDeque<Envelope>,
    fail_next_subscribe: Option<String>,
    fail_next_trigger: Option<String>,
    fail_next_recv: Option<String>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event to be returned by a later `recv()` call.
    pub fn queue_event(&self, envelope: Envelope) {
        let mut inner = self.inner.lock().unwrap();
        inner.receive_queue.push_back(envelope);
    }

    /// Get all events that were triggered.
    pub fn sent_events(&self) -> Vec<Envelope> {
        let inner = self.inner.lock().unwrap();
        inner.sent_events.clone()
    }

    /// Get the last event that was triggered.
    pub fn last_sent(&self) -> Option<Envelope> {
        let inner = self.inner.lock().unwrap();
        inner.sent_events.last().cloned()
    }

    /// Get the channel that was subscribed to.
    pub fn channel(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.channel.clone()
    }

    /// Cause the next subscribe() to fail with the given error.
    pub fn fail_next_subscribe(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_subscribe = Some(error.to_string());
    }

    /// Cause the next trigger() to fail with the given error.
    pub fn fail_next_trigger(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_trigger = Some(error.to_string());
    }

    /// Cause the next recv() to fail with the given error.
    pub fn fail_next_recv(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_recv = Some(error.to_string());
    }

    /// Clear all state (events, queue, subscription).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn subscribe(&self, channel: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();

        // Check for forced failure
        if let Some(error) = inner.fail_next_subscribe.take() {
            return Err(TransportError::SubscribeFailed(error));
        }

        inner.subscribed = true;
        inner.channel = Some(channel.to_string());
        inner
            .receive_queue
            .push_back(Envelope::subscription_succeeded());
        Ok(())
    }

    async fn trigger(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.subscribed {
            return Err(TransportError::NotSubscribed);
        }

        // Check for forced failure
        if let Some(error) = inner.fail_next_trigger.take() {
            return Err(TransportError::TriggerFailed(error));
        }

        inner.sent_events.push(envelope.clone());
        Ok(())
    }

    async fn recv(&self) -> Result<Envelope, TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.subscribed {
            return Err(TransportError::NotSubscribed);
        }

        // Check for forced failure
        if let Some(error) = inner.fail_next_recv.take() {
            return Err(TransportError::ReceiveFailed(error));
        }

        inner.receive_queue.pop_front().ok_or(TransportError::Idle)
    }

    fn is_subscribed(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.subscribed
    }

    async fn unsubscribe(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribed = false;
        inner.receive_queue.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> Envelope {
        Envelope::new(name, b"{}".to_vec())
    }

    // ===========================================
    // MockTransport Basic Tests
    // ===========================================

    #[tokio::test]
    async fn subscribe_confirms_with_transport_event() {
        let transport = MockTransport::new();
        assert!(!transport.is_subscribed());

        transport.subscribe("private-k1").await.unwrap();

        assert!(transport.is_subscribed());
        assert_eq!(transport.channel(), Some("private-k1".to_string()));
        assert!(transport.recv().await.unwrap().is_subscription_succeeded());
    }

    #[tokio::test]
    async fn triggers_are_captured() {
        let transport = MockTransport::new();
        transport.subscribe("private-k1").await.unwrap();

        transport.trigger(&event("client-chross:hello")).await.unwrap();
        transport.trigger(&event("client-chross:action")).await.unwrap();

        let sent = transport.sent_events();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].event, "client-chross:hello");
        assert_eq!(
            transport.last_sent().map(|e| e.event),
            Some("client-chross:action".to_string())
        );
    }

    #[tokio::test]
    async fn queued_events_come_back_in_order() {
        let transport = MockTransport::new();
        transport.subscribe("private-k1").await.unwrap();
        transport.recv().await.unwrap();

        transport.queue_event(event("a"));
        transport.queue_event(event("b"));

        assert_eq!(transport.recv().await.unwrap().event, "a");
        assert_eq!(transport.recv().await.unwrap().event, "b");
        assert!(matches!(transport.recv().await, Err(TransportError::Idle)));
    }

    #[tokio::test]
    async fn unsubscribe_drops_pending_events() {
        let transport = MockTransport::new();
        transport.subscribe("private-k1").await.unwrap();
        transport.queue_event(event("a"));

        transport.unsubscribe().await.unwrap();

        assert!(!transport.is_subscribed());
        assert!(matches!(
            transport.recv().await,
            Err(TransportError::NotSubscribed)
        ));
    }

    // ===========================================
    // Error Condition Tests
    // ===========================================

    #[tokio::test]
    async fn trigger_without_subscribe_fails() {
        let transport = MockTransport::new();
        let result = transport.trigger(&event("x")).await;
        assert!(matches!(result, Err(TransportError::NotSubscribed)));
    }

    #[tokio::test]
    async fn forced_subscribe_failure() {
        let transport = MockTransport::new();
        transport.fail_next_subscribe("forbidden");

        let result = transport.subscribe("private-k1").await;
        assert!(matches!(result, Err(TransportError::SubscribeFailed(_))));
        assert!(!transport.is_subscribed());
    }

    #[tokio::test]
    async fn forced_trigger_failure() {
        let transport = MockTransport::new();
        transport.subscribe("private-k1").await.unwrap();
        transport.fail_next_trigger("rate limited");

        let result = transport.trigger(&event("x")).await;
        assert!(matches!(result, Err(TransportError::TriggerFailed(_))));

        // Next trigger should work
        transport.trigger(&event("x")).await.unwrap();
        assert_eq!(transport.sent_events().len(), 1);
    }

    #[tokio::test]
    async fn forced_recv_failure() {
        let transport = MockTransport::new();
        transport.subscribe("private-k1").await.unwrap();
        transport.fail_next_recv("socket closed");

        let result = transport.recv().await;
        assert!(matches!(result, Err(TransportError::ReceiveFailed(_))));

        // The subscription confirmation is still queued
        assert!(transport.recv().await.unwrap().is_subscription_succeeded());
    }

    // ===========================================
    // Clone and Shared State Tests
    // ===========================================

    #[tokio::test]
    async fn clone_shares_state() {
        let transport1 = MockTransport::new();
        let transport2 = transport1.clone();

        transport1.subscribe("private-k1").await.unwrap();
        assert!(transport2.is_subscribed());

        transport2.trigger(&event("from t2")).await.unwrap();
        assert_eq!(transport1.sent_events().len(), 1);
    }

    #[tokio::test]
    async fn reset_clears_all() {
        let transport = MockTransport::new();
        transport.subscribe("private-k1").await.unwrap();
        transport.trigger(&event("x")).await.unwrap();

        transport.reset();

        assert!(!transport.is_subscribed());
        assert!(transport.sent_events().is_empty());
        assert!(transport.channel().is_none());
    }
}
