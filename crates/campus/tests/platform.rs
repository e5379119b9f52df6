use campus::Platform;
use campus::admissions::{ProfileField, SelfService};
use campus::domain::config::ClientConfig;
use campus::domain::constants::{APPLICANT_DRAFT_KEY, REGISTRATION_SCOPE};
use campus::domain::reference::ReferenceList;

async fn offline_config(data_dir: &std::path::Path) -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ClientConfig::default();
    config.api.base_url = format!("http://{addr}");
    config.api.timeout_seconds = 2;
    config.storage.data_dir = data_dir.to_path_buf();
    config
}

#[tokio::test]
async fn drafts_are_written_under_the_registration_scope() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Platform::open(offline_config(dir.path()).await).await.unwrap();

    let mut wizard = platform.wizard::<SelfService>().await.unwrap();
    assert_eq!(wizard.references().empty_lists().len(), 7);

    wizard.set_field(ProfileField::FirstName, "Selam").await.unwrap();

    let scope = platform.storage().scope(REGISTRATION_SCOPE).unwrap();
    assert!(scope.contains(APPLICANT_DRAFT_KEY).unwrap());
    assert!(dir.path().join(REGISTRATION_SCOPE).is_dir());
}

#[tokio::test]
async fn a_second_session_resumes_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = offline_config(dir.path()).await;
    config.storage.compression = true;

    {
        let platform = Platform::open(config.clone()).await.unwrap();
        let mut wizard = platform.wizard::<SelfService>().await.unwrap();
        wizard.set_field(ProfileField::Email, "selam@example.org").await.unwrap();
    }

    let platform = Platform::open(config).await.unwrap();
    let wizard = platform.wizard::<SelfService>().await.unwrap();
    assert_eq!(wizard.draft().profile.email.as_deref(), Some("selam@example.org"));
    assert!(wizard.options(ReferenceList::Regions).is_empty());
}
