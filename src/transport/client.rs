//! HTTP implementation of [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::{ApiError, Transport};
use crate::config::{CONNECT_TIMEOUT_SECS, ServiceConfig};
use crate::user_agent;

/// GraphQL client that POSTs each query to the service endpoint.
///
/// The underlying `reqwest::Client` is pooled, so one instance should be
/// shared for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
}

impl GraphqlClient {
    /// Creates a client for the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            endpoint: config.api_url().to_string(),
        }
    }

    /// The GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for GraphqlClient {
    #[instrument(skip(self, query), fields(endpoint = %self.endpoint))]
    async fn execute(&self, query: &str) -> Result<Value, ApiError> {
        debug!(query_len = query.len(), "posting query");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| ApiError::transport(&self.endpoint, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(&self.endpoint, e))?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => {
                if !status.is_success() {
                    warn!(status = status.as_u16(), "service returned error status with JSON body");
                }
                Ok(value)
            }
            Err(_) if !status.is_success() => {
                Err(ApiError::http_status(&self.endpoint, status.as_u16()))
            }
            Err(e) => Err(ApiError::decode(&self.endpoint, e)),
        }
    }
}

/// Builds the shared `reqwest::Client` used for both queries and media downloads.
///
/// # Errors
///
/// Returns [`ApiError::ClientBuild`] if the builder rejects the configuration.
pub fn build_http_client(config: &ServiceConfig) -> Result<Client, ApiError> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&user_agent::default_user_agent()) {
        headers.insert(USER_AGENT, value);
    }

    let mut builder = Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .gzip(true);
    if !config.verify_tls() {
        warn!("TLS certificate verification disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder
        .build()
        .map_err(|source| ApiError::ClientBuild { source })
}
