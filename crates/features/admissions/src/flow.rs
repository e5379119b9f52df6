//! The two registration flows and what distinguishes them.

use crate::draft::{ApplicantDraft, Draft, RegistrarDraft};
use crate::submission::{PayloadBuilder, SubmissionPayload, file_parts, map_enrollment, map_profile};
use crate::validation::{ApplicantIdentityCheck, Permissive, StepPolicy};
use campus_domain::constants::{
    APPLICANT_DRAFT_KEY, APPLICANT_STEP_KEY, APPLICANT_STEPS, APPLICANTS_ENDPOINT,
    REGISTRAR_DRAFT_KEY, REGISTRAR_STEP_KEY, REGISTRAR_STEPS, STUDENTS_ENDPOINT,
};

pub trait RegistrationFlow: Send + Sync + 'static {
    type Draft: Draft;
    type Policy: StepPolicy<Self::Draft>;

    const NAME: &'static str;
    const DRAFT_KEY: &'static str;
    const STEP_KEY: &'static str;
    const TOTAL_STEPS: u8;
    const ENDPOINT: &'static str;

    fn build_payload(draft: &Self::Draft) -> SubmissionPayload;
}

/// An applicant registering themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfService;

impl RegistrationFlow for SelfService {
    type Draft = ApplicantDraft;
    type Policy = ApplicantIdentityCheck;

    const NAME: &'static str = "applicant";
    const DRAFT_KEY: &'static str = APPLICANT_DRAFT_KEY;
    const STEP_KEY: &'static str = APPLICANT_STEP_KEY;
    const TOTAL_STEPS: u8 = APPLICANT_STEPS;
    const ENDPOINT: &'static str = APPLICANTS_ENDPOINT;

    fn build_payload(draft: &ApplicantDraft) -> SubmissionPayload {
        let mut data = PayloadBuilder::new();
        map_profile(&mut data, &draft.profile);
        SubmissionPayload { data: data.finish(), files: file_parts(&draft.attachments) }
    }
}

/// A registrar entering a student, including account and enrollment data.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrarAssisted;

impl RegistrationFlow for RegistrarAssisted {
    type Draft = RegistrarDraft;
    type Policy = Permissive;

    const NAME: &'static str = "registrar";
    const DRAFT_KEY: &'static str = REGISTRAR_DRAFT_KEY;
    const STEP_KEY: &'static str = REGISTRAR_STEP_KEY;
    const TOTAL_STEPS: u8 = REGISTRAR_STEPS;
    const ENDPOINT: &'static str = STUDENTS_ENDPOINT;

    fn build_payload(draft: &RegistrarDraft) -> SubmissionPayload {
        let mut data = PayloadBuilder::new();
        map_profile(&mut data, &draft.profile);
        map_enrollment(&mut data, &draft.enrollment);
        SubmissionPayload { data: data.finish(), files: file_parts(&draft.attachments) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{FileField, LocalFile};
    use serde_json::json;

    #[test]
    fn applicant_payload_excludes_enrollment_keys() {
        let mut draft = ApplicantDraft::default();
        draft.profile.first_name = Some("Abebe".to_owned());
        draft.attachments.photo = Some(FileField::Local(LocalFile::from_path("me.jpg")));

        let payload = SelfService::build_payload(&draft);
        assert_eq!(payload.data["firstNameENG"], json!("Abebe"));
        assert!(!payload.data.contains_key("password"));
        assert_eq!(payload.files.len(), 1);
    }

    #[test]
    fn registrar_payload_carries_enrollment() {
        let mut draft = RegistrarDraft::default();
        draft.profile.sex = Some("Female".to_owned());
        draft.enrollment.bcys = Some("14".to_owned());
        draft.enrollment.enrolled_day = Some("1".to_owned());
        draft.enrollment.enrolled_month = Some("10".to_owned());
        draft.enrollment.enrolled_year = Some("2024".to_owned());

        let payload = RegistrarAssisted::build_payload(&draft);
        assert_eq!(payload.data["gender"], json!("FEMALE"));
        assert_eq!(payload.data["batchClassYearSemesterId"], json!(14));
        assert_eq!(payload.data["dateEnrolledGC"], json!("2024-10-01"));
        assert!(payload.files.is_empty());
    }

    #[test]
    fn flows_use_separate_storage_keys() {
        assert_ne!(SelfService::DRAFT_KEY, RegistrarAssisted::DRAFT_KEY);
        assert_ne!(SelfService::STEP_KEY, RegistrarAssisted::STEP_KEY);
        assert_eq!(SelfService::TOTAL_STEPS, 4);
        assert_eq!(RegistrarAssisted::TOTAL_STEPS, 5);
    }
}
