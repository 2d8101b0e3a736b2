//! HTTP client for the hosted database REST endpoints
//!
//! The database exposes each table under `/rest/v1/<table>`. Every request
//! carries the project API key both as `apikey` and as a bearer token.

use super::payload::{
    ApiErrorResponse, ClientEnrollmentRequest, ClientRecord, ClientRegistrationRequest,
    HealthProgramRequest,
};
use super::traits::PersistenceClientTrait;
use crate::config::TuiConfig;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use thiserror::Error;

const REST_PREFIX: &str = "rest/v1";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint answered with a non-success status
    #[error("{message}")]
    Remote {
        status: u16,
        message: String,
        errors: Option<serde_json::Value>,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_remote(&self) -> bool {
        matches!(self, ApiError::Remote { .. })
    }
}

/// Build an [`ApiError::Remote`] from a failed response body
pub fn decode_error_body(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(payload) => ApiError::Remote {
            status: status.as_u16(),
            message: payload.message,
            errors: payload.errors,
        },
        Err(_) => ApiError::Remote {
            status: status.as_u16(),
            message: format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Error")
            ),
            errors: None,
        },
    }
}

/// Client for the hosted database
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, api_key)
    }

    /// Use a preconfigured HTTP client
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &TuiConfig) -> Self {
        Self::new(config.api_url(), config.api_key())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PREFIX, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn insert<T: Serialize + ?Sized>(&self, table: &str, body: &T) -> Result<(), ApiError> {
        let url = self.endpoint(table);
        tracing::debug!(%url, "inserting row");
        let response = self
            .authorized(self.http.post(&url))
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(decode_error_body(status, &text))
    }

    /// Whether the REST root answers at all
    pub async fn ping(&self) -> bool {
        let url = format!("{}/{}/", self.base_url, REST_PREFIX);
        match self.authorized(self.http.get(&url)).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "endpoint unreachable");
                false
            }
        }
    }
}

#[async_trait]
impl PersistenceClientTrait for ApiClient {
    async fn check_connection(&self) -> bool {
        self.ping().await
    }

    async fn register_client(
        &mut self,
        request: &ClientRegistrationRequest,
    ) -> Result<(), ApiError> {
        self.insert("clients", request).await
    }

    async fn enroll_client(&mut self, request: &ClientEnrollmentRequest) -> Result<(), ApiError> {
        self.insert("client_enrollments", request).await
    }

    async fn create_health_program(
        &mut self,
        request: &HealthProgramRequest,
    ) -> Result<(), ApiError> {
        self.insert("health_programs", request).await
    }

    async fn list_clients(&mut self) -> Result<Vec<ClientRecord>, ApiError> {
        let url = self.endpoint("clients_search");
        let response = self
            .authorized(self.http.get(&url))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(decode_error_body(status, &text));
        }
        let clients: Vec<ClientRecord> = serde_json::from_str(&text)?;
        tracing::info!(count = clients.len(), "loaded client registry");
        Ok(clients)
    }
}
