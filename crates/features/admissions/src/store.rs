//! Durable string storage behind the wizard: one draft key and one step key per flow.

use crate::error::AdmissionsError;
use campus_storage::ScopedStorage;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;

/// Port to the durable local store.
pub trait DraftStore: Clone + Send + Sync + 'static {
    fn load(&self, key: &str)
    -> impl Future<Output = Result<Option<String>, AdmissionsError>> + Send;

    fn save(&self, key: &str, value: &str) -> impl Future<Output = Result<(), AdmissionsError>> + Send;

    /// Removing an absent key is not an error.
    fn clear(&self, key: &str) -> impl Future<Output = Result<(), AdmissionsError>> + Send;
}

impl DraftStore for ScopedStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, AdmissionsError> {
        Ok(self.get_item(key).await?)
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), AdmissionsError> {
        Ok(self.set_item(key, value).await?)
    }

    async fn clear(&self, key: &str) -> Result<(), AdmissionsError> {
        self.remove_item(key).await?;
        Ok(())
    }
}

/// In-memory store shared between clones. Used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<FxHashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.items.read().contains_key(key)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.items.write().insert(key.into(), value.into());
    }
}

impl DraftStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, AdmissionsError> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), AdmissionsError> {
        self.insert(key, value);
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), AdmissionsError> {
        self.items.write().remove(key);
        Ok(())
    }
}
