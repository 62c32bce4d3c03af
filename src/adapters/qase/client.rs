//! reqwest-backed Qase client

use super::api::QaseApi;
use super::models::{ListResponse, StatusResponse};
use crate::config::QaseConfig;
use crate::domain::{
    BulkPayload, BulkRecord, MigrateError, ProjectCode, QaseError, Result, RunId, SourceResult,
    TestCase,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Header Qase reads the API token from
const TOKEN_HEADER: &str = "Token";

/// Qase REST API v1 client
///
/// Holds one connection pool for the whole migration. The token is attached
/// as a sensitive default header, so it never appears in request logs.
///
/// # Example
///
/// ```no_run
/// use qase_migrate::adapters::qase::{QaseApi, QaseClient};
/// use qase_migrate::config::{secret_string, QaseConfig};
/// use qase_migrate::domain::ProjectCode;
///
/// # async fn example() -> qase_migrate::domain::Result<()> {
/// let config = QaseConfig {
///     api_token: Some(secret_string("token".to_string())),
///     ..QaseConfig::default()
/// };
/// let client = QaseClient::new(&config)?;
/// let project = ProjectCode::new("CORE").map_err(qase_migrate::domain::MigrateError::Validation)?;
/// let first_page = client.list_cases(&project, 100, 0).await?;
/// # let _ = first_page;
/// # Ok(())
/// # }
/// ```
pub struct QaseClient {
    base_url: Url,
    client: Client,
}

impl QaseClient {
    /// Build a client from the Qase section of the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is missing or not a valid
    /// header value, if the base URL cannot be parsed, or if the HTTP client
    /// cannot be built.
    pub fn new(config: &QaseConfig) -> Result<Self> {
        let token = config
            .api_token
            .as_ref()
            .ok_or_else(|| MigrateError::Configuration("Qase API token is not set".to_string()))?;

        let mut token_value = HeaderValue::from_str(token.expose_secret().as_ref())
            .map_err(|_| {
                MigrateError::Configuration("Qase API token is not a valid header value".to_string())
            })?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            MigrateError::Configuration(format!("Invalid Qase base URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MigrateError::Configuration(format!(
                "Invalid Qase base URL '{}'",
                config.base_url
            )));
        }

        let mut builder = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the Qase API");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| MigrateError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    /// Append path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, QaseError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QaseError::ConnectionFailed(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<Vec<T>, QaseError> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QaseError::ConnectionFailed(e.to_string()))?;

        let body = read_success_body(response).await?;
        let envelope: ListResponse<T> = serde_json::from_str(&body)
            .map_err(|e| QaseError::InvalidResponse(format!("Failed to decode listing: {e}")))?;
        envelope.into_entities()
    }
}

/// Return the body of a 2xx response, or map the status to an error
async fn read_success_body(response: Response) -> std::result::Result<String, QaseError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| QaseError::ConnectionFailed(format!("Failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(QaseError::from_status(status.as_u16(), body));
    }

    tracing::trace!(status = status.as_u16(), body = %body, "Qase response");
    Ok(body)
}

#[async_trait]
impl QaseApi for QaseClient {
    async fn list_cases(
        &self,
        project: &ProjectCode,
        limit: usize,
        offset: usize,
    ) -> std::result::Result<Vec<TestCase>, QaseError> {
        let mut url = self.endpoint(&["case", project.as_str()])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        self.get_page(url).await
    }

    async fn list_results(
        &self,
        project: &ProjectCode,
        run: RunId,
        limit: usize,
        offset: usize,
    ) -> std::result::Result<Vec<SourceResult>, QaseError> {
        let mut url = self.endpoint(&["result", project.as_str()])?;
        url.query_pairs_mut()
            .append_pair("run", &run.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        self.get_page(url).await
    }

    async fn create_results_bulk(
        &self,
        project: &ProjectCode,
        run: RunId,
        records: &[BulkRecord],
    ) -> std::result::Result<(), QaseError> {
        let run_segment = run.to_string();
        let url = self.endpoint(&["result", project.as_str(), &run_segment, "bulk"])?;
        let payload = BulkPayload::new(records);

        if tracing::enabled!(tracing::Level::TRACE) {
            if let Ok(json) = serde_json::to_string(&payload) {
                tracing::trace!(payload = %json, "Bulk payload");
            }
        }
        tracing::debug!(url = %url, records = records.len(), "POST bulk results");

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| QaseError::ConnectionFailed(e.to_string()))?;

        let body = read_success_body(response).await?;
        if body.trim().is_empty() {
            return Ok(());
        }

        let envelope: StatusResponse = serde_json::from_str(&body)
            .map_err(|e| QaseError::InvalidResponse(format!("Failed to decode bulk response: {e}")))?;
        envelope.ensure_ok()
    }

    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}
