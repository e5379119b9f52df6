use campus_domain::constants::*;

#[test]
fn storage_keys_are_distinct_per_flow() {
    let keys = [APPLICANT_DRAFT_KEY, APPLICANT_STEP_KEY, REGISTRAR_DRAFT_KEY, REGISTRAR_STEP_KEY];
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert_eq!(REGISTRATION_SCOPE, "registration");
}

#[test]
fn flows_have_expected_step_counts() {
    assert_eq!(APPLICANT_STEPS, 4);
    assert_eq!(REGISTRAR_STEPS, 5);
}
