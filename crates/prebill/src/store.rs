//! Key-value persistence for workflow state.
//!
//! The workflow keeps two independent entries: the cart and the packing
//! status map. Each is written on its own after the mutation that changed
//! it; there is no transaction spanning both, so a crash between the two
//! writes can leave them out of step.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

/// Key holding the serialized cart lines.
pub const CART_KEY: &str = "prebill.cart";

/// Key holding the serialized packing status map.
pub const PACKING_STATUS_KEY: &str = "prebill.packing_status";

/// Errors from a key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable string key-value storage scoped to one session.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// In-process store.
///
/// Clones share the same entries, so a test can keep one handle and hand
/// another to a workflow.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key).await)
    }

    async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_loads_none() {
        let store = MemoryStore::new();
        assert!(store.load(CART_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemoryStore::new();
        store.save(CART_KEY, "[]".to_string()).await.unwrap();
        store.save(CART_KEY, "[1]".to_string()).await.unwrap();
        assert_eq!(store.load(CART_KEY).await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store
            .save(PACKING_STATUS_KEY, "{}".to_string())
            .await
            .unwrap();
        assert_eq!(handle.get(PACKING_STATUS_KEY).await.as_deref(), Some("{}"));
    }
}
