//! Backend API client
//!
//! JSON over reqwest: builds URLs from the configured base, applies a hard
//! timeout per call and classifies failures as [`ApiError`]. GETs retry
//! transient failures ([`ApiError::is_transient`]) with exponential delay;
//! POSTs are sent exactly once.

use std::future::Future;
use std::time::Duration;

use agendaflow_domain::{AgendaError, BackendConfig};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::errors::ApiError;
use crate::errors::InfraError;

/// Retry delays stop doubling after this many retries.
const MAX_BACKOFF_SHIFT: u32 = 8;

/// Configuration for [`BackendClient`]
#[derive(Debug, Clone)]
pub struct BackendClientConfig {
    /// Base URL of the scheduling backend (e.g. `http://localhost:5000`)
    pub base_url: String,
    /// Timeout for a whole call, retries included
    pub timeout: Duration,
    /// Total attempts for GET requests
    pub max_attempts: usize,
    /// Delay before the first GET retry
    pub base_backoff: Duration,
    pub user_agent: String,
}

impl Default for BackendClientConfig {
    fn default() -> Self {
        Self::from(&BackendConfig::default())
    }
}

impl From<&BackendConfig> for BackendClientConfig {
    fn from(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.request_timeout(),
            max_attempts: config.max_attempts,
            base_backoff: Duration::from_millis(200),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// JSON client for the scheduling backend
pub struct BackendClient {
    client: Client,
    config: BackendClientConfig,
}

impl BackendClient {
    /// # Errors
    /// [`ApiError::Config`] when the base URL is invalid or the transport
    /// cannot be built.
    pub fn new(config: BackendClientConfig) -> Result<Self, ApiError> {
        Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL '{}': {e}", config.base_url)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .no_proxy()
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendClientConfig {
        &self.config
    }

    /// Execute a GET request
    ///
    /// # Errors
    /// Transport, status or parse failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_timeout(path, &[], self.config.timeout).await
    }

    /// Execute a GET request with query parameters
    ///
    /// # Errors
    /// Transport, status or parse failure.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.get_with_timeout(path, query, self.config.timeout).await
    }

    /// Execute a GET request bounded by `timeout` instead of the default
    ///
    /// # Errors
    /// Transport, status or parse failure. [`ApiError::Timeout`] when the
    /// deadline passes, retries included.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_with_timeout<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET request");

        let mut request = self.client.request(Method::GET, &url).timeout(timeout);
        if !query.is_empty() {
            request = request.query(query);
        }

        let attempts = self.config.max_attempts;
        let response = Self::within(timeout, self.send(request, attempts, timeout)).await?;
        let result = Self::decode(response).await?;

        debug!(path = %path, "GET request successful");
        Ok(result)
    }

    /// Execute a POST request. Sent once, never retried.
    ///
    /// # Errors
    /// Transport, status or parse failure.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST request");

        let timeout = self.config.timeout;
        let request = self.client.request(Method::POST, &url).json(body);
        let response = Self::within(timeout, self.send(request, 1, timeout)).await?;
        let result = Self::decode(response).await?;

        debug!(path = %path, "POST request successful");
        Ok(result)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send up to `attempts` times while the failure is transient.
    async fn send(
        &self,
        request: RequestBuilder,
        attempts: usize,
        timeout: Duration,
    ) -> Result<Response, ApiError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;

        loop {
            match Self::execute(&request, timeout).await {
                Err(err) if err.is_transient() && attempt < attempts => {
                    let delay = self.retry_delay(attempt);
                    debug!(attempt, delay_ms = delay.as_millis(), error = %err, "retrying request");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// One attempt. Non-2xx answers become errors here so they can be retried.
    async fn execute(request: &RequestBuilder, timeout: Duration) -> Result<Response, ApiError> {
        let request = request
            .try_clone()
            .ok_or_else(|| ApiError::Config("request body cannot be replayed".into()))?;
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::from_transport(AgendaError::from(InfraError::from(err)), timeout))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(Self::map_status_error(status, &url, &body))
    }

    fn retry_delay(&self, attempt: usize) -> Duration {
        let shift = u32::try_from(attempt.saturating_sub(1)).map_or(MAX_BACKOFF_SHIFT, |shift| {
            shift.min(MAX_BACKOFF_SHIFT)
        });
        self.config.base_backoff.saturating_mul(1 << shift)
    }

    async fn within<F>(timeout: Duration, send: F) -> Result<Response, ApiError>
    where
        F: Future<Output = Result<Response, ApiError>>,
    {
        tokio::time::timeout(timeout, send).await.unwrap_or_else(|_| {
            warn!(timeout_ms = timeout.as_millis(), "backend request timed out");
            Err(ApiError::Timeout(timeout))
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();

        // 204/205 carry no body
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Malformed(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    status.as_u16()
                ))
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Malformed(format!("Failed to parse response: {e}")))
    }

    fn map_status_error(status: StatusCode, url: &str, body: &str) -> ApiError {
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Unauthorized(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimit(message)
        } else if status == StatusCode::NOT_FOUND {
            ApiError::NotFound(message)
        } else if status.is_server_error() {
            ApiError::Server(message)
        } else if status.is_client_error() {
            ApiError::Client(message)
        } else {
            ApiError::Network(message)
        }
    }
}
