use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    backend::{
        credentials::resolve_credential,
        error::{
            BackendError, BackendErrorKind, configuration_error, protocol_error, transport_error,
        },
        ports::AssessmentBackend,
        types::{EquityResponse, HttpBackendConfig, ResolvedCredential, TriageResponse},
    },
    observation::{ClinicalObservation, EquityInput, PatientSearchInput},
    records::PatientSummary,
};

pub const TRIAGE_SCORE_PATH: &str = "/triage-score";
pub const PATIENT_SUMMARY_PATH: &str = "/patient-summary";
pub const EXPLORE_EQUITY_PATH: &str = "/explore-equity";

/// Forwards submissions to a remote scoring service. Failures are surfaced
/// once; there is no retry.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    credential: Option<ResolvedCredential>,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &HttpBackendConfig) -> Result<Self, BackendError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(configuration_error("backend base_url cannot be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(configuration_error(format!(
                "backend base_url must be an http(s) URL, got '{base_url}'"
            )));
        }

        let credential = resolve_credential(&config.credential)?;
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| configuration_error(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            credential,
            timeout: Duration::from_millis(config.timeout_ms.max(1)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).timeout(self.timeout).json(body);
        if let Some(credential) = &self.credential {
            request = request.basic_auth(&credential.username, credential.password.as_ref());
        }

        tracing::debug!(target: "backend", endpoint = path, "http_request_sent");
        let response = request.send().await.map_err(|err| {
            transport_error(format!("request to {path} failed: {err}")).with_endpoint(path)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = map_http_error(status, path, &body);
            tracing::warn!(
                target: "backend",
                endpoint = path,
                status = status.as_u16(),
                error = %err,
                "http_request_failed"
            );
            return Err(err);
        }

        response.json::<R>().await.map_err(|err| {
            protocol_error(format!("unexpected response body from {path}: {err}"))
                .with_endpoint(path)
        })
    }
}

/// Prefers the service's `detail` field, otherwise `API Error: <status> <reason>`.
pub fn map_http_error(status: StatusCode, endpoint: &str, body: &str) -> BackendError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(Value::as_str).map(str::to_string))
        .filter(|detail| !detail.trim().is_empty());
    let message = detail.unwrap_or_else(|| {
        format!(
            "API Error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string()
    });

    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendErrorKind::Authentication,
        _ => BackendErrorKind::Http,
    };

    BackendError::new(kind, message)
        .with_endpoint(endpoint)
        .with_http_status(status.as_u16())
}

#[async_trait]
impl AssessmentBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn triage_score(
        &self,
        input: ClinicalObservation,
    ) -> Result<TriageResponse, BackendError> {
        self.post_json(TRIAGE_SCORE_PATH, &input).await
    }

    async fn patient_summary(
        &self,
        input: PatientSearchInput,
    ) -> Result<PatientSummary, BackendError> {
        self.post_json(PATIENT_SUMMARY_PATH, &input).await
    }

    async fn explore_equity(&self, input: EquityInput) -> Result<EquityResponse, BackendError> {
        self.post_json(EXPLORE_EQUITY_PATH, &input).await
    }
}
