use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use campus_admissions::submission::Attachment;
use campus_admissions::{
    AdmissionsError, HttpBackend, ReferenceCache, ReferenceSource, SubmissionPayload,
    SubmissionSink,
};
use campus_domain::config::ApiConfig;
use campus_domain::reference::{DropdownOption, ReferenceList};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Part {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

type Captured = Arc<Mutex<Vec<Part>>>;

async fn regions(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer test-token");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "data": [
            { "regionCode": "01", "region": "Tigray" },
            { "regionCode": "14", "region": "Addis Ababa" },
        ]})),
    )
}

async fn students(State(captured): State<Captured>, mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let part = Part {
            name: field.name().unwrap_or_default().to_owned(),
            file_name: field.file_name().map(str::to_owned),
            content_type: field.content_type().map(str::to_owned),
            body: field.bytes().await.unwrap().to_vec(),
        };
        captured.lock().push(part);
    }
    (StatusCode::CREATED, Json(json!({ "id": 42 })))
}

async fn applicants() -> impl IntoResponse {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "message": "Invalid phone" })))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

async fn backend() -> (HttpBackend, Captured) {
    let captured = Captured::default();
    let router = Router::new()
        .route("/api/regions", get(regions))
        .route("/api/students", post(students))
        .route("/api/applicants", post(applicants))
        .with_state(captured.clone());
    let base_url = serve(router).await;

    let config = ApiConfig {
        base_url: format!("{base_url}/"),
        timeout_seconds: 5,
        bearer_token: Some("test-token".to_owned()),
    };
    (HttpBackend::new(&config).unwrap(), captured)
}

fn payload(data: Value, files: Vec<Attachment>) -> SubmissionPayload {
    let Value::Object(data) = data else { panic!("payload data must be an object") };
    SubmissionPayload { data, files }
}

#[tokio::test]
async fn reference_lists_are_fetched_with_bearer_auth() {
    let (backend, _) = backend().await;
    assert!(!backend.base_url().ends_with('/'));

    let cache = ReferenceCache::new(backend);
    assert_eq!(cache.load(ReferenceList::Regions).await, 2);
    assert_eq!(cache.options(ReferenceList::Regions)[1], DropdownOption::new("14", "Addis Ababa"));
}

#[tokio::test]
async fn missing_routes_surface_as_rejections() {
    let (backend, _) = backend().await;

    let err = backend.fetch("/api/unknown").await.unwrap_err();
    assert!(matches!(err, AdmissionsError::Rejected { status: 404, .. }), "{err:?}");
}

#[tokio::test]
async fn submission_sends_data_part_and_files() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("face.jpg");
    std::fs::write(&photo, b"jpeg-bytes").unwrap();

    let (backend, captured) = backend().await;
    let files = vec![Attachment {
        part: "photo",
        path: photo.clone(),
        file_name: "face.jpg".to_owned(),
        content_type: "image/jpeg".to_owned(),
    }];

    let receipt = backend
        .submit("/api/students", payload(json!({ "firstNameENG": "Hana", "age": 19 }), files))
        .await
        .unwrap();
    assert_eq!(receipt.status, 201);
    assert_eq!(receipt.body, json!({ "id": 42 }));

    let parts = captured.lock().clone();
    assert_eq!(parts.len(), 2);

    let data = parts.iter().find(|p| p.name == "data").unwrap();
    assert_eq!(data.content_type.as_deref(), Some("application/json"));
    let decoded: Map<String, Value> = serde_json::from_slice(&data.body).unwrap();
    assert_eq!(decoded["firstNameENG"], json!("Hana"));
    assert_eq!(decoded["age"], json!(19));

    let file = parts.iter().find(|p| p.name == "photo").unwrap();
    assert_eq!(file.file_name.as_deref(), Some("face.jpg"));
    assert_eq!(file.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(file.body, b"jpeg-bytes");
}

#[tokio::test]
async fn rejection_carries_the_server_message() {
    let (backend, _) = backend().await;

    let err = backend.submit("/api/applicants", payload(json!({}), Vec::new())).await.unwrap_err();
    assert!(matches!(err, AdmissionsError::Rejected { status: 422, .. }));
    assert_eq!(err.user_message(), "Invalid phone");
}

#[tokio::test]
async fn unreadable_attachment_fails_before_sending() {
    let (backend, captured) = backend().await;
    let files = vec![Attachment {
        part: "document",
        path: Path::new("/definitely/not/here.pdf").to_path_buf(),
        file_name: "here.pdf".to_owned(),
        content_type: "application/pdf".to_owned(),
    }];

    let err = backend.submit("/api/students", payload(json!({}), files)).await.unwrap_err();
    assert!(matches!(err, AdmissionsError::Io { .. }), "{err:?}");
    assert!(captured.lock().is_empty());
}

#[tokio::test]
async fn closed_port_is_reported_as_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_seconds: 2,
        bearer_token: None,
    };
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.fetch("/api/regions").await.unwrap_err();
    assert!(matches!(err, AdmissionsError::Unreachable { .. }), "{err:?}");
    assert_eq!(
        err.user_message(),
        "Unable to reach the server. Check your internet connection and try again."
    );
}

#[tokio::test]
async fn connection_closed_without_response_is_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_seconds: 2,
        bearer_token: None,
    };
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.submit("/api/students", SubmissionPayload::default()).await.unwrap_err();
    assert!(matches!(err, AdmissionsError::Unreachable { .. }), "{err:?}");
    assert_eq!(
        err.user_message(),
        "Unable to reach the server. Check your internet connection and try again."
    );
}
