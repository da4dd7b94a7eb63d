//! In-memory pub/sub hub.
//!
//! Every [`HubTransport`] handed out by one [`MemoryHub`] shares its
//! channels. A trigger is delivered to every other endpoint subscribed to
//! the same channel, never back to the sender, which is how client events
//! behave on hosted channel services. Used for hot-seat play and for
//! driving two sessions against each other in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use chross_types::Envelope;

use super::{Transport, TransportError};

/// A set of channels shared by the endpoints it hands out.
#[derive(Debug, Clone, Default)]
pub struct MemoryHub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Debug, Default)]
struct HubInner {
    next_id: usize,
    endpoints: HashMap<usize, Endpoint>,
}

#[derive(Debug, Default)]
struct Endpoint {
    channel: Option<String>,
    inbox: VecDeque<Envelope>,
}

impl MemoryHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a new, unsubscribed endpoint.
    pub fn connect(&self) -> HubTransport {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.endpoints.insert(id, Endpoint::default());
        HubTransport {
            hub: self.clone(),
            id,
        }
    }

    /// Events waiting in any endpoint's inbox.
    pub fn pending(&self) -> usize {
        self.lock().endpoints.values().map(|e| e.inbox.len()).sum()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One endpoint of a [`MemoryHub`].
#[derive(Debug)]
pub struct HubTransport {
    hub: MemoryHub,
    id: usize,
}

impl HubTransport {
    /// Events waiting in this endpoint's inbox.
    pub fn pending(&self) -> usize {
        self.hub
            .lock()
            .endpoints
            .get(&self.id)
            .map_or(0, |e| e.inbox.len())
    }
}

#[async_trait]
impl Transport for HubTransport {
    async fn subscribe(&self, channel: &str) -> Result<(), TransportError> {
        let mut inner = self.hub.lock();
        let endpoint = inner.endpoints.entry(self.id).or_default();
        endpoint.channel = Some(channel.to_string());
        endpoint.inbox.push_back(Envelope::subscription_succeeded());
        Ok(())
    }

    async fn trigger(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let mut inner = self.hub.lock();
        let channel = inner
            .endpoints
            .get(&self.id)
            .and_then(|e| e.channel.clone())
            .ok_or(TransportError::NotSubscribed)?;

        for (id, endpoint) in inner.endpoints.iter_mut() {
            if *id != self.id && endpoint.channel.as_deref() == Some(channel.as_str()) {
                endpoint.inbox.push_back(envelope.clone());
            }
        }
        Ok(())
    }

    async fn recv(&self) -> Result<Envelope, TransportError> {
        let mut inner = self.hub.lock();
        let endpoint = inner
            .endpoints
            .get_mut(&self.id)
            .filter(|e| e.channel.is_some())
            .ok_or(TransportError::NotSubscribed)?;
        endpoint.inbox.pop_front().ok_or(TransportError::Idle)
    }

    fn is_subscribed(&self) -> bool {
        self.hub
            .lock()
            .endpoints
            .get(&self.id)
            .is_some_and(|e| e.channel.is_some())
    }

    async fn unsubscribe(&self) -> Result<(), TransportError> {
        let mut inner = self.hub.lock();
        if let Some(endpoint) = inner.endpoints.get_mut(&self.id) {
            endpoint.channel = None;
            endpoint.inbox.clear();
        }
        Ok(())
    }
}

impl Drop for HubTransport {
    fn drop(&mut self) {
        self.hub.lock().endpoints.remove(&self.id);
    }
}
