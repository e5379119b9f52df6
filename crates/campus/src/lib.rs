//! Facade crate for the campus registrar client.
//! Re-exports domain/kernel primitives and wires configuration into storage and HTTP.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Load a [`domain::config::ClientConfig`] with [`kernel::config::load_config`].
//! - Call [`Platform::open`] once, then [`Platform::wizard`] per registration session.

pub use campus_admissions as admissions;
pub use campus_domain as domain;
pub use campus_kernel as kernel;
pub use campus_storage as storage;

use campus_admissions::{AdmissionsError, HttpBackend, RegistrationFlow, RegistrationWizard};
use campus_domain::config::ClientConfig;
use campus_domain::constants::REGISTRATION_SCOPE;
use campus_storage::{Compression, LocalStorage, ScopedStorage};
use tracing::info;

/// Wizard type produced by [`Platform::wizard`].
pub type Wizard<F> = RegistrationWizard<F, ScopedStorage, HttpBackend>;

/// Long-lived services shared by every wizard session of the process.
#[derive(Debug, Clone)]
pub struct Platform {
    config: ClientConfig,
    storage: LocalStorage,
    drafts: ScopedStorage,
    backend: HttpBackend,
}

impl Platform {
    /// Opens the local store under `storage.data_dir` and prepares the backend client.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the data directory is unusable and
    /// [`AdmissionsError::Http`] when the HTTP client cannot be built.
    pub async fn open(config: ClientConfig) -> Result<Self, AdmissionsError> {
        let compression =
            if config.storage.compression { Compression::Lz4 } else { Compression::None };

        let storage = LocalStorage::builder()
            .root(&config.storage.data_dir)
            .compression(compression)
            .open()
            .await?;
        let drafts = storage.scope(REGISTRATION_SCOPE)?;
        let backend = HttpBackend::new(&config.api)?;

        info!(api = backend.base_url(), drafts = %drafts.path().display(), "Platform ready");
        Ok(Self { config, storage, drafts, backend })
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    #[must_use]
    pub const fn backend(&self) -> &HttpBackend {
        &self.backend
    }

    /// Starts (or resumes) a registration session of flow `F`.
    ///
    /// # Errors
    /// See [`RegistrationWizard::open`].
    pub async fn wizard<F: RegistrationFlow>(&self) -> Result<Wizard<F>, AdmissionsError> {
        RegistrationWizard::open(self.drafts.clone(), self.backend.clone()).await
    }
}
