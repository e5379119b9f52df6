use crate::cascade::{CascadeController, CascadeState};
use crate::draft::{Draft, FileSlot, LocalFile, ProfileField};
use crate::error::AdmissionsError;
use crate::flow::RegistrationFlow;
use crate::form::FormStore;
use crate::reference::{ReferenceCache, ReferenceSource};
use crate::sequencer::{StepIndex, StepSequencer};
use crate::store::DraftStore;
use crate::submission::{SubmissionReceipt, SubmissionSink};
use crate::validation::StepPolicy;
use campus_domain::reference::{CascadeTarget, DropdownOption, ReferenceList};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Moved(StepIndex),
    /// Already at the boundary.
    Stayed(StepIndex),
    /// The step policy refused; lists the blank required fields.
    Blocked(Vec<ProfileField>),
}

const fn address_fields(target: CascadeTarget) -> [ProfileField; 3] {
    match target {
        CascadeTarget::Birth => {
            [ProfileField::BirthRegion, ProfileField::BirthZone, ProfileField::BirthWoreda]
        },
        CascadeTarget::Current => {
            [ProfileField::CurrentRegion, ProfileField::CurrentZone, ProfileField::CurrentWoreda]
        },
    }
}

type FieldOf<F> = <<F as RegistrationFlow>::Draft as Draft>::Field;

/// Backend of a wizard session: reference data plus the submission endpoint.
pub trait WizardBackend: ReferenceSource + SubmissionSink + Clone {}

impl<T: ReferenceSource + SubmissionSink + Clone> WizardBackend for T {}

/// One registration session of flow `F`, persisted through `S`, talking to `B`.
pub struct RegistrationWizard<F: RegistrationFlow, S, B> {
    form: FormStore<F::Draft, S>,
    steps: StepSequencer<S>,
    policy: F::Policy,
    references: ReferenceCache<B>,
    cascade: CascadeController<B>,
    backend: B,
}

impl<F: RegistrationFlow, S: DraftStore, B> fmt::Debug for RegistrationWizard<F, S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationWizard")
            .field("flow", &F::NAME)
            .field("step", &self.steps.current())
            .field("draft", self.form.draft())
            .finish_non_exhaustive()
    }
}

impl<F, S, B> RegistrationWizard<F, S, B>
where
    F: RegistrationFlow,
    S: DraftStore,
    B: WizardBackend,
{
    /// Restores the saved draft and step, loads the reference lists and rebuilds the address
    /// cascades for any restored selections.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the store cannot be read. Reference fetch
    /// failures are not errors; the affected lists stay empty.
    pub async fn open(store: S, backend: B) -> Result<Self, AdmissionsError> {
        let form = FormStore::restore(store.clone(), F::DRAFT_KEY).await?;
        let steps = StepSequencer::restore(store, F::STEP_KEY, F::TOTAL_STEPS).await?;

        let wizard = Self {
            form,
            steps,
            policy: F::Policy::default(),
            references: ReferenceCache::new(backend.clone()),
            cascade: CascadeController::new(backend.clone()),
            backend,
        };

        let profile = wizard.form.draft().profile();
        tokio::join!(
            wizard.references.load_all(),
            wizard.cascade.resume(
                CascadeTarget::Birth,
                profile.birth_region.as_deref(),
                profile.birth_zone.as_deref(),
                profile.birth_woreda.as_deref(),
            ),
            wizard.cascade.resume(
                CascadeTarget::Current,
                profile.current_region.as_deref(),
                profile.current_zone.as_deref(),
                profile.current_woreda.as_deref(),
            ),
        );

        info!(flow = F::NAME, step = wizard.step().get(), "Registration wizard opened");
        Ok(wizard)
    }

    #[must_use]
    pub const fn draft(&self) -> &F::Draft {
        self.form.draft()
    }

    #[must_use]
    pub const fn step(&self) -> StepIndex {
        self.steps.current()
    }

    #[must_use]
    pub const fn total_steps(&self) -> u8 {
        self.steps.total()
    }

    #[must_use]
    pub fn is_step_valid(&self) -> bool {
        self.policy.is_step_valid(self.step(), self.draft())
    }

    /// # Errors
    /// Returns [`AdmissionsError::Storage`] or [`AdmissionsError::Serialization`] when the
    /// draft cannot be persisted.
    pub async fn set_field(
        &mut self,
        field: FieldOf<F>,
        value: impl Into<String>,
    ) -> Result<(), AdmissionsError> {
        self.form.set_field(field, value).await
    }

    /// Sets a field addressed by its storage name (e.g. `firstName`).
    ///
    /// # Errors
    /// Returns [`AdmissionsError::UnknownField`] for names the flow does not have, otherwise as
    /// [`RegistrationWizard::set_field`].
    pub async fn set_field_named(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), AdmissionsError> {
        let field = <F::Draft as Draft>::field_named(name)?;
        self.form.set_field(field, value).await
    }

    /// Attaches a local file. Returns its preview URI.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Io`] when the path is not a readable file, otherwise as
    /// [`RegistrationWizard::set_field`].
    pub async fn attach(
        &mut self,
        slot: FileSlot,
        path: impl Into<PathBuf>,
    ) -> Result<String, AdmissionsError> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await.map_err(|source| AdmissionsError::Io {
            source,
            context: Some(format!("Cannot attach {}", path.display()).into()),
        })?;
        if !metadata.is_file() {
            return Err(AdmissionsError::Io {
                source: std::io::Error::other("not a regular file"),
                context: Some(format!("Cannot attach {}", path.display()).into()),
            });
        }
        self.form.attach(slot, LocalFile::from_path(path)).await
    }

    /// # Errors
    /// See [`RegistrationWizard::set_field`].
    pub async fn detach(&mut self, slot: FileSlot) -> Result<(), AdmissionsError> {
        self.form.detach(slot).await
    }

    /// Moves forward if the current step passes the flow's policy.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the new step cannot be persisted.
    pub async fn advance(&mut self) -> Result<Navigation, AdmissionsError> {
        let missing = self.policy.missing(self.step(), self.draft());
        if !missing.is_empty() {
            return Ok(Navigation::Blocked(missing));
        }
        Ok(if self.steps.advance().await? {
            Navigation::Moved(self.step())
        } else {
            Navigation::Stayed(self.step())
        })
    }

    /// Moves back. Never validated.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the new step cannot be persisted.
    pub async fn retreat(&mut self) -> Result<Navigation, AdmissionsError> {
        Ok(if self.steps.retreat().await? {
            Navigation::Moved(self.step())
        } else {
            Navigation::Stayed(self.step())
        })
    }

    #[must_use]
    pub fn options(&self, list: ReferenceList) -> Vec<DropdownOption> {
        self.references.options(list)
    }

    #[must_use]
    pub const fn references(&self) -> &ReferenceCache<B> {
        &self.references
    }

    #[must_use]
    pub fn cascade(&self, target: CascadeTarget) -> CascadeState {
        self.cascade.state(target)
    }

    /// Stores the region, clears the dependent zone and woreda and loads the zones.
    ///
    /// # Errors
    /// See [`RegistrationWizard::set_field`]. Zone fetch failures leave an empty list.
    pub async fn select_region(
        &mut self,
        target: CascadeTarget,
        region_code: &str,
    ) -> Result<(), AdmissionsError> {
        let [region, zone, woreda]: [FieldOf<F>; 3] = address_fields(target).map(Into::into);
        self.form.clear_fields(&[zone, woreda]).await?;
        self.form.set_field(region, region_code.trim()).await?;
        self.cascade.fetch_zones_by_region(region_code, target).await;
        Ok(())
    }

    /// Stores the zone, clears the dependent woreda and loads the woredas.
    ///
    /// # Errors
    /// See [`RegistrationWizard::select_region`].
    pub async fn select_zone(
        &mut self,
        target: CascadeTarget,
        zone_code: &str,
    ) -> Result<(), AdmissionsError> {
        let [_, zone, woreda]: [FieldOf<F>; 3] = address_fields(target).map(Into::into);
        self.form.clear_field(woreda).await?;
        self.form.set_field(zone, zone_code.trim()).await?;
        self.cascade.fetch_woredas_by_zone(zone_code, target).await;
        Ok(())
    }

    /// # Errors
    /// See [`RegistrationWizard::set_field`].
    pub async fn select_woreda(
        &mut self,
        target: CascadeTarget,
        woreda_code: &str,
    ) -> Result<(), AdmissionsError> {
        let [_, _, woreda]: [FieldOf<F>; 3] = address_fields(target).map(Into::into);
        self.form.set_field(woreda, woreda_code.trim()).await?;
        self.cascade.select_woreda(target, woreda_code);
        Ok(())
    }

    /// Sends the draft to the flow's endpoint.
    ///
    /// On success both storage keys of the flow are removed and the session starts over at
    /// step 1 with an empty draft. Once the backend has accepted, a failure to remove the keys
    /// is only logged and the receipt is still returned. On failure nothing changes; show
    /// [`AdmissionsError::user_message`] to the operator.
    ///
    /// # Errors
    /// Returns the backend's rejection or transport error.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, AdmissionsError> {
        let payload = F::build_payload(self.draft());
        info!(
            flow = F::NAME,
            fields = payload.data.len(),
            files = payload.files.len(),
            "Registration submission started"
        );

        let receipt = match self.backend.submit(F::ENDPOINT, payload).await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(flow = F::NAME, error = %err, "Registration submission failed");
                return Err(err);
            },
        };

        info!(flow = F::NAME, status = receipt.status, "Registration accepted");
        if let Err(err) = self.reset().await {
            warn!(flow = F::NAME, error = %err, "Accepted draft could not be cleared from storage");
        }
        Ok(receipt)
    }

    /// Throws the draft away without submitting.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the stored keys cannot be removed.
    pub async fn discard(&mut self) -> Result<(), AdmissionsError> {
        self.reset().await?;
        info!(flow = F::NAME, "Registration draft discarded");
        Ok(())
    }

    /// Always empties the in-memory session; reports the first storage failure.
    async fn reset(&mut self) -> Result<(), AdmissionsError> {
        let form = self.form.reset().await;
        let steps = self.steps.reset().await;
        self.cascade.reset();
        form.and(steps)
    }
}
