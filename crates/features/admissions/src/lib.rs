//! Student registration feature slice.
//!
//! A [`RegistrationWizard`] walks an operator through a fixed number of steps, keeps the draft
//! and the current step in a [`DraftStore`] after every change, fills dropdowns from the backend
//! and finally submits the draft as a multipart request. Two flows exist:
//! [`SelfService`] for applicants and [`RegistrarAssisted`] for registrar staff.

pub mod cascade;
pub mod draft;
mod error;
pub mod flow;
pub mod form;
pub mod http;
pub mod reference;
pub mod sequencer;
pub mod store;
pub mod submission;
pub mod validation;
mod wizard;

pub use crate::error::{AdmissionsError, AdmissionsErrorExt};
pub use cascade::{CascadeController, CascadeState};
pub use draft::{
    ApplicantDraft, Draft, EnrollmentField, FileField, FileSlot, LocalFile, ProfileField,
    RegistrarDraft, RegistrarField,
};
pub use flow::{RegistrarAssisted, RegistrationFlow, SelfService};
pub use http::HttpBackend;
pub use reference::{ReferenceCache, ReferenceSource};
pub use sequencer::StepIndex;
pub use store::{DraftStore, MemoryStore};
pub use submission::{SubmissionPayload, SubmissionReceipt, SubmissionSink};
pub use wizard::{Navigation, RegistrationWizard, WizardBackend};
