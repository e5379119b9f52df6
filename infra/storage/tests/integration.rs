use campus_storage::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_item_reads_as_none() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();

    assert_eq!(storage.get_item("applicantRegistrationDraft").await.unwrap(), None);
}

#[tokio::test]
async fn test_set_get_roundtrip_uncompressed() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();

    storage.set_item("registrarStudentStep", "3").await.unwrap();
    assert_eq!(storage.get_item("registrarStudentStep").await.unwrap().as_deref(), Some("3"));

    storage.set_item("registrarStudentStep", "4").await.unwrap();
    assert_eq!(storage.get_item("registrarStudentStep").await.unwrap().as_deref(), Some("4"));
}

#[tokio::test]
async fn test_lz4_items_are_transparent() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder()
        .root(temp.path())
        .compression(Compression::Lz4)
        .open()
        .await
        .unwrap();
    let scope = storage.scope("registration").unwrap();

    let draft = format!(r#"{{"firstName":"Abebe","remark":"{}"}}"#, "x".repeat(2048));
    scope.set_item("registrarStudentDraft", &draft).await.unwrap();

    let on_disk = std::fs::read(scope.path().join("registrarStudentDraft.item")).unwrap();
    assert!(on_disk.len() < draft.len(), "repetitive drafts should compress");
    assert_eq!(scope.get_item("registrarStudentDraft").await.unwrap(), Some(draft));
}

#[tokio::test]
async fn test_non_ascii_values_survive() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();

    storage.set_item("nameAmh", "አበበ በቀለ").await.unwrap();
    assert_eq!(storage.get_item("nameAmh").await.unwrap().as_deref(), Some("አበበ በቀለ"));
}

#[tokio::test]
async fn test_scope_isolation() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();

    let a = storage.scope("registration").unwrap();
    let b = storage.scope("archive").unwrap();

    a.set_item("draft", "a").await.unwrap();
    b.set_item("draft", "b").await.unwrap();

    assert_eq!(a.get_item("draft").await.unwrap().as_deref(), Some("a"));
    assert_eq!(b.get_item("draft").await.unwrap().as_deref(), Some("b"));
    assert_eq!(storage.get_item("draft").await.unwrap(), None);
}

#[tokio::test]
async fn test_remove_and_contains() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();
    let scope = storage.scope("registration").unwrap();

    scope.set_item("applicantRegistrationStep", "2").await.unwrap();
    assert!(scope.contains("applicantRegistrationStep").unwrap());

    assert!(scope.remove_item("applicantRegistrationStep").await.unwrap());
    assert!(!scope.contains("applicantRegistrationStep").unwrap());
    assert!(!scope.remove_item("applicantRegistrationStep").await.unwrap());
}

#[tokio::test]
async fn test_invalid_keys_and_scopes_are_rejected() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();

    assert!(matches!(
        storage.set_item("../escape", "x").await,
        Err(StorageError::InvalidKey { .. })
    ));
    assert!(matches!(storage.get_item("").await, Err(StorageError::InvalidKey { .. })));
    assert!(matches!(
        storage.scope("../other"),
        Err(StorageError::PathTraversalAttempt { .. })
    ));
}

#[tokio::test]
async fn test_open_without_create_requires_existing_root() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");

    let result = LocalStorage::builder().root(&missing).create(false).open().await;
    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test]
async fn test_values_persist_across_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();
        storage.scope("registration").unwrap().set_item("step", "5").await.unwrap();
    }

    let reopened = LocalStorage::builder().root(temp.path()).open().await.unwrap();
    let value = reopened.scope("registration").unwrap().get_item("step").await.unwrap();
    assert_eq!(value.as_deref(), Some("5"));
}

#[tokio::test]
async fn test_concurrent_writes_leave_one_complete_value() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage.set_item("draft", &format!("value-{i}")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let value = storage.get_item("draft").await.unwrap().unwrap();
    assert!(value.starts_with("value-"));
}

#[tokio::test]
async fn test_fresh_leftover_temp_file_does_not_block_writes() {
    let temp = TempDir::new().unwrap();
    let scope_dir = temp.path().join("registration");
    std::fs::create_dir_all(&scope_dir).unwrap();
    let leftover = scope_dir.join("step.item.campustmp.1");
    std::fs::write(&leftover, b"3").unwrap();

    let storage = LocalStorage::builder().root(temp.path()).open().await.unwrap();
    let scope = storage.scope("registration").unwrap();
    scope.set_item("step", "2").await.unwrap();

    assert_eq!(scope.get_item("step").await.unwrap().as_deref(), Some("2"));
    assert!(leftover.exists());
}
