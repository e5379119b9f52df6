//! `reqwest` implementation of the reference and submission ports.

use crate::error::{AdmissionsError, AdmissionsErrorExt};
use crate::reference::ReferenceSource;
use crate::submission::{SubmissionPayload, SubmissionReceipt, SubmissionSink};
use campus_derive::api_model;
use campus_domain::config::ApiConfig;
use campus_domain::constants::DATA_PART;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Error body returned by the backend on rejected requests.
#[api_model(deny_unknown_fields = false)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the registrar REST backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpBackend {
    /// # Errors
    /// Returns [`AdmissionsError::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: &ApiConfig) -> Result<Self, AdmissionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            bearer_token: config.bearer_token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, AdmissionsError> {
        let response = request.send().await.map_err(|err| transport(err, path))?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "Backend responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        Err(AdmissionsError::Rejected {
            status: status.as_u16(),
            message: message.map(Into::into),
            context: Some(path.to_owned().into()),
        })
    }
}

/// Maps a failed `send()`. No status line was received, so anything but a malformed request
/// counts as the server being unreachable: refused, reset, closed mid-exchange or timed out.
fn transport(err: reqwest::Error, path: &str) -> AdmissionsError {
    if err.is_builder() {
        return AdmissionsError::Http { source: err, context: Some(path.to_owned().into()) };
    }
    AdmissionsError::Unreachable {
        message: err.to_string().into(),
        context: Some(path.to_owned().into()),
    }
}

/// Failures reading a body that arrived after a status line.
fn body_error(err: reqwest::Error, path: &str) -> AdmissionsError {
    AdmissionsError::Http { source: err, context: Some(path.to_owned().into()) }
}

impl ReferenceSource for HttpBackend {
    async fn fetch(&self, path: &str) -> Result<Value, AdmissionsError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        response.json::<Value>().await.map_err(|err| body_error(err, path))
    }
}

impl SubmissionSink for HttpBackend {
    async fn submit(
        &self,
        endpoint: &str,
        payload: SubmissionPayload,
    ) -> Result<SubmissionReceipt, AdmissionsError> {
        let data = Part::text(payload.data_json()?)
            .mime_str("application/json")
            .context("Invalid data part")?;
        let mut form = Form::new().part(DATA_PART, data);

        for file in payload.files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .context(format!("Failed to read attachment {}", file.path.display()))?;
            let part = Part::bytes(bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .context("Invalid attachment content type")?;
            form = form.part(file.part, part);
        }

        info!(endpoint, fields = payload.data.len(), "Submitting registration");
        let request = self.request(Method::POST, endpoint).multipart(form);
        let response = self.send(request, endpoint).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|err| body_error(err, endpoint))?;

        Ok(SubmissionReceipt { status, body: serde_json::from_str(&text).unwrap_or(Value::Null) })
    }
}
