//! Core engine: a directory-backed key/value store with the semantics of browser local storage.
//!
//! Every item is a single file `<root>/[<scope>/]<key>.item` holding a UTF-8 string. Writes
//! are atomic (unique temp file, `fsync`, rename) so a crash mid-write leaves either the old
//! value or the new one, never a torn file.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::keys::{ItemKey, ScopeName};
use crate::maintenance;
use crate::scope::ScopedStorage;
use crate::security;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub(crate) const ITEM_SUFFIX: &str = "item";
pub(crate) const TMP_MARKER: &str = ".campustmp.";
const NONCE_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Tags temporary files of one open storage so a leftover from an earlier process never
/// collides with a fresh write.
pub(crate) fn tmp_nonce() -> String {
    nanoid::nanoid!(8, &NONCE_ALPHABET)
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

/// The internal shared state of a [`LocalStorage`] instance.
#[derive(Debug)]
pub struct LocalStorageInner {
    /// Canonicalized physical root of the sandbox.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    /// Per-open prefix of temporary file names.
    pub(crate) tmp_nonce: String,
    /// Monotonic counter used to name temporary files.
    pub(crate) tmp_counter: AtomicU64,
}

/// A cloneable handle to the local key/value store.
///
/// # Example
///
/// ```rust
/// use campus_storage::{LocalStorage, StorageError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let storage = LocalStorage::builder().root(tmp.path()).open().await?;
///
///     let registration = storage.scope("registration")?;
///     registration.set_item("applicantRegistrationStep", "2").await?;
///     assert_eq!(registration.get_item("applicantRegistrationStep").await?.as_deref(), Some("2"));
///
///     registration.remove_item("applicantRegistrationStep").await?;
///     assert!(registration.get_item("applicantRegistrationStep").await?.is_none());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pub(crate) inner: Arc<LocalStorageInner>,
}

impl Deref for LocalStorage {
    type Target = LocalStorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl LocalStorage {
    #[must_use = "The storage engine is not initialized until you call .open()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// Returns a view whose items live in their own sub-directory.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] if the name is empty or contains
    /// anything other than ASCII alphanumerics and underscores.
    pub fn scope<N>(&self, name: N) -> Result<ScopedStorage, StorageError>
    where
        N: TryInto<ScopeName, Error = StorageError>,
    {
        Ok(ScopedStorage::new(self.clone(), name.try_into()?))
    }

    /// Physical root directory of the sandbox.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads an item; `Ok(None)` when it has never been set or was removed.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for malformed keys, [`StorageError::Decompress`] or
    /// [`StorageError::Encoding`] for corrupted items and [`StorageError::Io`] otherwise.
    pub async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get_internal(None, key).await
    }

    /// Atomically replaces an item.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for malformed keys and [`StorageError::Io`] when the
    /// disk refuses the write.
    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_internal(None, key, value).await
    }

    /// Removes an item. Returns whether something was removed.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for malformed keys and [`StorageError::Io`] when the
    /// file exists but cannot be deleted.
    pub async fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        self.remove_internal(None, key).await
    }

    /// Cleans up temporary files orphaned by interrupted writes.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    pub(crate) fn item_path(
        &self,
        scope: Option<&ScopeName>,
        key: &str,
    ) -> Result<PathBuf, StorageError> {
        let key = ItemKey::parse(key)?;
        let mut relative = PathBuf::new();
        if let Some(scope) = scope {
            relative.push(scope.as_ref());
        }
        relative.push(key.file_name());
        security::confine(&self.root, &relative)
    }

    pub(crate) async fn get_internal(
        &self,
        scope: Option<&ScopeName>,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let path = self.item_path(scope, key)?;

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        let bytes = self.compression.decompress(raw)?;
        let value = String::from_utf8(bytes).context(format!("Item {key}"))?;
        Ok(Some(value))
    }

    pub(crate) async fn set_internal(
        &self,
        scope: Option<&ScopeName>,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let path = self.item_path(scope, key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create scope directory for {}", path.display()))?;
        }

        let temp = self.tmp_path(&path);
        let encoded = self.compression.compress(value.as_bytes());

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&encoded).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &path).await {
            // Some platforms refuse to rename over an existing file.
            if err.kind() != ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&temp).await;
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Atomic swap failed: {}", path.display()).into()),
                });
            }
            fs::remove_file(&path)
                .await
                .context(format!("Failed to replace existing item: {}", path.display()))?;
            fs::rename(&temp, &path)
                .await
                .context(format!("Atomic swap failed: {}", path.display()))?;
        }

        if let Some(parent) = path.parent() {
            sync_dir(parent).await;
        }

        debug!(key, bytes = value.len(), "Item saved atomically");
        Ok(())
    }

    pub(crate) async fn remove_internal(
        &self,
        scope: Option<&ScopeName>,
        key: &str,
    ) -> Result<bool, StorageError> {
        let path = self.item_path(scope, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Item removed");
                Ok(true)
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to remove: {}", path.display()).into()),
            }),
        }
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("item");
        target.with_file_name(format!("{file_name}{TMP_MARKER}{}.{counter}", self.tmp_nonce))
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}
