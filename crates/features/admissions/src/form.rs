use crate::draft::{Draft, FileField, FileSlot, LocalFile};
use crate::error::{AdmissionsError, AdmissionsErrorExt};
use crate::store::DraftStore;
use campus_kernel::safe_nanoid;
use fxhash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PREVIEW_SCHEME: &str = "preview://";

/// Session-scoped preview handles for picked files.
///
/// A handle stays valid until it is revoked; replacing or clearing a file revokes the old one.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: FxHashMap<String, PathBuf>,
}

impl PreviewRegistry {
    pub fn issue(&mut self, path: &Path) -> String {
        let uri = format!("{PREVIEW_SCHEME}{}", safe_nanoid!());
        self.live.insert(uri.clone(), path.to_path_buf());
        uri
    }

    /// Returns whether the handle was live.
    pub fn revoke(&mut self, uri: &str) -> bool {
        self.live.remove(uri).is_some()
    }

    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<&Path> {
        self.live.get(uri).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    fn clear(&mut self) {
        self.live.clear();
    }
}

/// The single mutable draft of a wizard session, written through to the store on every change.
#[derive(Debug)]
pub struct FormStore<D, S> {
    draft: D,
    key: &'static str,
    store: S,
    previews: PreviewRegistry,
}

impl<D: Draft, S: DraftStore> FormStore<D, S> {
    /// Loads the persisted draft, or starts empty.
    ///
    /// A stored value that no longer parses is logged and replaced by an empty draft on the
    /// next write. Local attachments get fresh previews.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the store cannot be read.
    pub async fn restore(store: S, key: &'static str) -> Result<Self, AdmissionsError> {
        let draft = match store.load(key).await? {
            None => D::default(),
            Some(raw) => serde_json::from_str::<D>(&raw).unwrap_or_else(|err| {
                warn!(key, error = %err, "Discarding unreadable draft");
                D::default()
            }),
        };

        let mut form = Self { draft, key, store, previews: PreviewRegistry::default() };
        let previews = &mut form.previews;
        for file in form.draft.attachments_mut().iter_mut() {
            if let FileField::Local(local) = file {
                local.preview = Some(previews.issue(&local.path));
            }
        }

        debug!(key, "Draft restored");
        Ok(form)
    }

    #[must_use]
    pub const fn draft(&self) -> &D {
        &self.draft
    }

    #[must_use]
    pub const fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Replaces one text field, keeping all others, and persists the whole draft.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Serialization`] or [`AdmissionsError::Storage`] when the draft
    /// cannot be persisted; the in-memory value is already updated.
    pub async fn set_field(
        &mut self,
        field: D::Field,
        value: impl Into<String>,
    ) -> Result<(), AdmissionsError> {
        *self.draft.text_mut(field) = Some(value.into());
        self.persist().await
    }

    /// # Errors
    /// See [`FormStore::set_field`].
    pub async fn clear_field(&mut self, field: D::Field) -> Result<(), AdmissionsError> {
        if self.draft.text_mut(field).take().is_none() {
            return Ok(());
        }
        self.persist().await
    }

    /// Clears several fields with a single write.
    ///
    /// # Errors
    /// See [`FormStore::set_field`].
    pub async fn clear_fields(&mut self, fields: &[D::Field]) -> Result<(), AdmissionsError> {
        for field in fields {
            *self.draft.text_mut(*field) = None;
        }
        self.persist().await
    }

    /// Attaches a file and releases the preview of the file it replaces.
    ///
    /// # Errors
    /// See [`FormStore::set_field`].
    pub async fn attach(
        &mut self,
        slot: FileSlot,
        mut file: LocalFile,
    ) -> Result<String, AdmissionsError> {
        let preview = self.previews.issue(&file.path);
        file.preview = Some(preview.clone());

        let previous = self.draft.attachments_mut().slot_mut(slot).replace(FileField::Local(file));
        self.release(previous);

        self.persist().await?;
        Ok(preview)
    }

    /// # Errors
    /// See [`FormStore::set_field`].
    pub async fn detach(&mut self, slot: FileSlot) -> Result<(), AdmissionsError> {
        let previous = self.draft.attachments_mut().slot_mut(slot).take();
        if previous.is_none() {
            return Ok(());
        }
        self.release(previous);
        self.persist().await
    }

    /// Empties the draft and removes it from the store.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the draft key cannot be removed.
    pub async fn reset(&mut self) -> Result<(), AdmissionsError> {
        self.draft = D::default();
        self.previews.clear();
        self.store.clear(self.key).await
    }

    fn release(&mut self, previous: Option<FileField>) {
        if let Some(FileField::Local(LocalFile { preview: Some(uri), .. })) = previous {
            self.previews.revoke(&uri);
        }
    }

    async fn persist(&self) -> Result<(), AdmissionsError> {
        let json = serde_json::to_string(&self.draft).context("Failed to encode draft")?;
        self.store.save(self.key, &json).await?;
        debug!(key = self.key, bytes = json.len(), "Draft saved");
        Ok(())
    }
}
