use serde::de::DeserializeOwned;

use crate::error::{StoreError, StoreResult};
use crate::traits::SnapshotStore;

/// A single-blob summary: the whole persisted state of one ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryBlob {
    pub key: String,
    pub contents: Vec<u8>,
}

impl SummaryBlob {
    pub fn new(key: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            contents,
        }
    }

    /// Persist the blob under its key.
    pub async fn write_to(&self, store: &dyn SnapshotStore) -> StoreResult<()> {
        store.write(&self.key, &self.contents).await
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

/// Read the blob under `key` and parse it as JSON.
pub async fn read_and_parse<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    key: &str,
) -> StoreResult<T> {
    let bytes = store.read(key).await?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySnapshotStore;

    #[tokio::test]
    async fn write_to_then_read_and_parse() {
        let store = InMemorySnapshotStore::new();
        let summary = SummaryBlob::new("header", br#"["a","b"]"#.to_vec());
        summary.write_to(&store).await.unwrap();

        let parsed: Vec<String> = read_and_parse(&store, "header").await.unwrap();
        assert_eq!(parsed, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(summary.size(), 9);
    }

    #[tokio::test]
    async fn unparsable_blob_is_serialization_error() {
        let store = InMemorySnapshotStore::from_blob("header", b"not json".to_vec());
        let err = read_and_parse::<Vec<String>>(&store, "header")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn missing_blob_propagates_not_found() {
        let store = InMemorySnapshotStore::new();
        let err = read_and_parse::<Vec<String>>(&store, "header")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
