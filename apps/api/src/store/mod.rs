#![allow(dead_code)]

//! Persistence store — durable key-value state behind an injectable trait.
//!
//! Everything the core persists (usage counters, the entitlement flag, chat
//! transcripts) goes through `KvStore` as UTF-8 text. Counters are stored in
//! decimal string form; transcripts as JSON. Production uses Postgres; tests
//! swap in `MemoryKvStore`.
//!
//! `AppState` holds an `Arc<dyn KvStore>` so no caller names a concrete
//! backend — same pattern as the pluggable generation backend.

pub mod postgres;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

pub use postgres::{create_pool, PostgresKvStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored value could not be encoded or decoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// The persistence seam. Implementations must be safe to share across
/// handlers; a missing key is `Ok(None)`, never an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store. Used as the test double for everything that persists;
/// not wired into the production state.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrips() {
        let store = MemoryKvStore::new();
        store.put("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryKvStore::new();
        store.put("k", "1").await.unwrap();
        store.put("k", "2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));
    }
}
