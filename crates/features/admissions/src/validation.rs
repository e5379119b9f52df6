//! Gates on forward navigation.

use crate::draft::{Draft, ProfileField};
use crate::sequencer::StepIndex;

/// Decides whether the operator may leave a step.
pub trait StepPolicy<D: Draft>: Default + Send + Sync + 'static {
    /// Required fields of `step` that are still blank.
    fn missing(&self, step: StepIndex, draft: &D) -> Vec<ProfileField>;

    fn is_step_valid(&self, step: StepIndex, draft: &D) -> bool {
        self.missing(step, draft).is_empty()
    }
}

/// Lets every step through.
///
/// The registrar flow currently runs without client-side checks and leaves validation to the
/// backend. Tightening this is a product decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissive;

impl<D: Draft> StepPolicy<D> for Permissive {
    fn missing(&self, _step: StepIndex, _draft: &D) -> Vec<ProfileField> {
        Vec::new()
    }
}

/// Requires the applicant's names, sex and phone number on step 1. Later steps pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicantIdentityCheck;

impl ApplicantIdentityCheck {
    pub const REQUIRED: [ProfileField; 5] = [
        ProfileField::FirstName,
        ProfileField::MiddleName,
        ProfileField::LastName,
        ProfileField::Sex,
        ProfileField::PhoneNumber,
    ];
}

impl<D: Draft> StepPolicy<D> for ApplicantIdentityCheck {
    fn missing(&self, step: StepIndex, draft: &D) -> Vec<ProfileField> {
        if step != StepIndex::FIRST {
            return Vec::new();
        }
        let profile = draft.profile();
        Self::REQUIRED
            .into_iter()
            .filter(|field| profile.get(*field).is_none_or(|value| value.trim().is_empty()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{ApplicantDraft, RegistrarDraft};

    fn step(n: u8) -> StepIndex {
        StepIndex::new(n, 5).unwrap()
    }

    #[test]
    fn empty_applicant_is_blocked_on_step_one_only() {
        let draft = ApplicantDraft::default();
        let policy = ApplicantIdentityCheck;

        assert_eq!(policy.missing(step(1), &draft), ApplicantIdentityCheck::REQUIRED.to_vec());
        assert!(!policy.is_step_valid(step(1), &draft));
        assert!(policy.is_step_valid(step(2), &draft));
        assert!(policy.is_step_valid(step(4), &draft));
    }

    #[test]
    fn whitespace_does_not_count_as_a_value() {
        let mut draft = ApplicantDraft::default();
        for field in ApplicantIdentityCheck::REQUIRED {
            *draft.profile.slot_mut(field) = Some("x".to_owned());
        }
        draft.profile.phone_number = Some("   ".to_owned());

        assert_eq!(
            ApplicantIdentityCheck.missing(step(1), &draft),
            vec![ProfileField::PhoneNumber]
        );

        draft.profile.phone_number = Some("0911223344".to_owned());
        assert!(ApplicantIdentityCheck.is_step_valid(step(1), &draft));
    }

    #[test]
    fn permissive_always_passes() {
        let draft = RegistrarDraft::default();
        for n in 1..=5 {
            assert!(Permissive.is_step_valid(step(n), &draft));
        }
    }
}
