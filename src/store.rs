//! Key-value persistence abstraction for URL mappings
//!
//! Handlers only ever see the [`Store`] trait. The production backend lives in
//! [`crate::database`]; [`MemoryStore`] backs unit and integration tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of the persistence layer, distinct from a missing key
#[derive(Debug, Error)]
pub enum StoreError {
    /// The embedded database reported an error
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    /// A stored record could not be encoded or decoded
    #[error("corrupt record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blocking task running the operation panicked or was cancelled
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Point-write / point-read mapping from short ID to long URL
///
/// Implementations must tolerate concurrent calls from unrelated requests.
/// Single-key atomicity is all that is required; `put` follows the backend's
/// upsert behavior and performs no existence check.
#[async_trait]
pub trait Store: Send + Sync {
    /// Writes the mapping `short_id -> long_url`
    async fn put(&self, short_id: &str, long_url: &str) -> Result<(), StoreError>;

    /// Looks up the long URL for `short_id`, `Ok(None)` when no mapping exists
    async fn get(&self, short_id: &str) -> Result<Option<String>, StoreError>;
}

/// In-process store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, short_id: &str, long_url: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        entries.insert(short_id.to_string(), long_url.to_string());
        Ok(())
    }

    async fn get(&self, short_id: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(entries.get(short_id).cloned())
    }
}
