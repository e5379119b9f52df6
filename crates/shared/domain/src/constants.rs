//! Storage keys and REST paths shared between the client and the operator console.

/// Storage scope holding every registration wizard item.
pub const REGISTRATION_SCOPE: &str = "registration";

pub const APPLICANT_DRAFT_KEY: &str = "applicantRegistrationDraft";
pub const APPLICANT_STEP_KEY: &str = "applicantRegistrationStep";
pub const REGISTRAR_DRAFT_KEY: &str = "registrarStudentDraft";
pub const REGISTRAR_STEP_KEY: &str = "registrarStudentStep";

pub const APPLICANTS_ENDPOINT: &str = "/api/applicants";
pub const STUDENTS_ENDPOINT: &str = "/api/students";

pub const APPLICANT_STEPS: u8 = 4;
pub const REGISTRAR_STEPS: u8 = 5;

/// Multipart part carrying the JSON payload.
pub const DATA_PART: &str = "data";
pub const PHOTO_PART: &str = "photo";
pub const DOCUMENT_PART: &str = "document";
