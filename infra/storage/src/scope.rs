use crate::engine::LocalStorage;
use crate::error::StorageError;
use crate::keys::ScopeName;
use std::path::PathBuf;

/// A view of [`LocalStorage`] whose items live under `<root>/<scope>/`.
///
/// Two scopes never observe each other's items, even when they use the same keys.
#[derive(Debug, Clone)]
pub struct ScopedStorage {
    storage: LocalStorage,
    name: ScopeName,
}

impl ScopedStorage {
    pub(crate) const fn new(storage: LocalStorage, name: ScopeName) -> Self {
        Self { storage, name }
    }

    #[must_use]
    pub const fn name(&self) -> &ScopeName {
        &self.name
    }

    /// Physical location of the scope directory. It may not exist until the first write.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.storage.root().join(self.name.as_ref())
    }

    /// # Errors
    /// See [`LocalStorage::get_item`].
    pub async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_internal(Some(&self.name), key).await
    }

    /// # Errors
    /// See [`LocalStorage::set_item`].
    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_internal(Some(&self.name), key, value).await
    }

    /// # Errors
    /// See [`LocalStorage::remove_item`].
    pub async fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        self.storage.remove_internal(Some(&self.name), key).await
    }

    /// Whether an item exists, without reading it.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for malformed keys.
    pub fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.storage.item_path(Some(&self.name), key)?.is_file())
    }
}
