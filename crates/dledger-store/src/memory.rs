use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::summary::SummaryBlob;
use crate::traits::SnapshotStore;

/// In-memory, HashMap-based snapshot store.
///
/// Intended for tests and embedding. Blobs are held behind a `RwLock` and
/// cloned on read/write.
pub struct InMemorySnapshotStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySnapshotStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-populated with a single blob.
    pub fn from_blob(key: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.into(), bytes);
        Self {
            blobs: RwLock::new(blobs),
        }
    }

    /// Create a store holding a ledger summary, ready to bootstrap a replica.
    pub fn from_summary(summary: &SummaryBlob) -> Self {
        Self::from_blob(summary.key.clone(), summary.contents.clone())
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of all keys in the store.
    pub fn keys(&self) -> Vec<String> {
        let map = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        let map = self.blobs.read().map_err(|_| StoreError::Poisoned)?;
        map.get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let mut map = self.blobs.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(key.to_string(), bytes.to_vec());
        debug!(key, size = bytes.len(), "snapshot blob written");
        Ok(())
    }

    async fn contains(&self, key: &str) -> StoreResult<bool> {
        let map = self.blobs.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemorySnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySnapshotStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read() {
        let store = InMemorySnapshotStore::new();
        store.write("header", b"[1,2]").await.unwrap();

        assert_eq!(store.read("header").await.unwrap(), b"[1,2]".to_vec());
        assert!(store.contains("header").await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let store = InMemorySnapshotStore::new();
        let err = store.read("header").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(key) if key == "header"));
        assert!(!store.contains("header").await.unwrap());
    }

    #[tokio::test]
    async fn write_replaces_previous_blob() {
        let store = InMemorySnapshotStore::from_blob("header", b"old".to_vec());
        store.write("header", b"new").await.unwrap();
        assert_eq!(store.read("header").await.unwrap(), b"new".to_vec());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemorySnapshotStore::from_blob("b", vec![]);
        store.blobs.write().unwrap().insert("a".into(), vec![]);
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn from_summary_exposes_blob_under_its_key() {
        let summary = SummaryBlob::new("header", b"[]".to_vec());
        let store = InMemorySnapshotStore::from_summary(&summary);
        assert_eq!(store.read("header").await.unwrap(), b"[]".to_vec());
    }
}
