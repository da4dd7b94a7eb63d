//! In-memory cache.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CacheError, StateCache};

/// Cache kept in process memory.
///
/// Clones share the same records, so a test can keep a handle and
/// inspect what a session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Check if no record is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl StateCache for MemoryCache {
    async fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn store(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.records
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.records.lock().await.remove(key);
        Ok(())
    }
}
