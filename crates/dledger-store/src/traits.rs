use async_trait::async_trait;

use crate::error::StoreResult;

/// Key/blob storage for ledger snapshots.
///
/// All implementations must satisfy these invariants:
/// - A successful `write` is visible to every later `read` of the same key.
/// - `read` of a key that was never written returns `StoreError::NotFound`.
/// - The store never interprets blob contents.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the blob stored under `key`.
    async fn read(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Store `bytes` under `key`, replacing any previous blob.
    async fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Check whether a blob exists under `key`.
    async fn contains(&self, key: &str) -> StoreResult<bool>;
}
