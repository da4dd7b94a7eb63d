//! Local persistence of a session's log for offline resume.
//!
//! A cache is a flat string store, one record per `(namespace, game key)`
//! pair. Every record is fully overwritten on write.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use chross_types::{Action, GameKey};

/// Cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to read or write a record.
    #[error("failed to access cache record {path}: {source}")]
    Io {
        /// Location of the record
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A stored record does not parse.
    #[error("cache record {key} is corrupt: {source}")]
    Corrupt {
        /// Record key
        key: String,
        /// The parse error
        source: serde_json::Error,
    },

    /// A snapshot could not be serialized.
    #[error("failed to encode cache record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Read/write contract of the local cache.
#[async_trait]
pub trait StateCache: Send + Sync {
    /// Read a record, `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a record, replacing any previous value.
    async fn store(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete a record. Deleting an absent record is not an error.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Record key for a game: `playState_{namespace}_{game_key}`.
pub fn cache_key(namespace: &str, game_key: &GameKey) -> String {
    format!("playState_{}_{}", namespace, game_key)
}

/// A cached session: the live board plus the log it was reached by.
///
/// `initial_board` is absent in records written before it was tracked;
/// such records replay from the caller's initial board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<B, M> {
    /// Board after the last action
    pub board: B,
    /// Committed actions in log order
    pub actions: Vec<Action<M>>,
    /// Board the actions replay from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_board: Option<B>,
}

impl<B: Serialize, M: Serialize> Snapshot<B, M> {
    /// Serialize to the stored JSON form.
    pub fn encode(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(CacheError::Encode)
    }
}

impl<B: DeserializeOwned, M: DeserializeOwned> Snapshot<B, M> {
    /// Parse a stored record.
    pub fn decode(key: &str, raw: &str) -> Result<Self, CacheError> {
        serde_json::from_str(raw).map_err(|source| CacheError::Corrupt {
            key: key.to_string(),
            source,
        })
    }
}
