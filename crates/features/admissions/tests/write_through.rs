use campus_admissions::form::FormStore;
use campus_admissions::sequencer::StepSequencer;
use campus_admissions::{ApplicantDraft, MemoryStore, ProfileField};
use proptest::prelude::*;
use strum::IntoEnumIterator;

const DRAFT_KEY: &str = "applicantRegistrationDraft";
const STEP_KEY: &str = "applicantRegistrationStep";

#[derive(Debug, Clone)]
enum Edit {
    Set(usize, String),
    Clear(usize),
    Advance,
    Retreat,
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (0..64usize, "[A-Za-z0-9 ]{0,12}").prop_map(|(i, v)| Edit::Set(i, v)),
        1 => (0..64usize).prop_map(Edit::Clear),
        1 => Just(Edit::Advance),
        1 => Just(Edit::Retreat),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

proptest! {
    #[test]
    fn reopened_session_matches_memory_after_any_edits(edits in proptest::collection::vec(edit(), 1..40)) {
        let fields: Vec<ProfileField> = ProfileField::iter().collect();
        let store = MemoryStore::new();

        let (draft, step) = runtime().block_on(async {
            let mut form =
                FormStore::<ApplicantDraft, _>::restore(store.clone(), DRAFT_KEY).await.unwrap();
            let mut steps = StepSequencer::restore(store.clone(), STEP_KEY, 4).await.unwrap();

            for edit in edits {
                match edit {
                    Edit::Set(i, value) => {
                        form.set_field(fields[i % fields.len()], value).await.unwrap();
                    },
                    Edit::Clear(i) => form.clear_field(fields[i % fields.len()]).await.unwrap(),
                    Edit::Advance => {
                        steps.advance().await.unwrap();
                    },
                    Edit::Retreat => {
                        steps.retreat().await.unwrap();
                    },
                }
            }
            (form.draft().clone(), steps.current())
        });

        let (restored_draft, restored_step) = runtime().block_on(async {
            let form =
                FormStore::<ApplicantDraft, _>::restore(store.clone(), DRAFT_KEY).await.unwrap();
            let steps = StepSequencer::restore(store.clone(), STEP_KEY, 4).await.unwrap();
            (form.draft().clone(), steps.current())
        });

        prop_assert_eq!(draft, restored_draft);
        prop_assert_eq!(step, restored_step);
        prop_assert!((1..=4).contains(&step.get()));
    }
}
