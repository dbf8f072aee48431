//! Shared HTTP client for HTTP-based generation backends
//!
//! One `reqwest::Client` configured per backend, with per-request timeouts
//! and status-code mapping to typed backend errors. Deliberately no retry
//! loop at this layer: retry and fallback are chain-pattern decisions.

use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use promptchain_utils::error::BackendError;

/// Maximum HTTP timeout regardless of the requested invocation timeout.
const MAX_HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for generation providers.
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Misconfiguration` if the client cannot be
    /// constructed.
    pub fn new() -> Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| {
                BackendError::Misconfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Start a POST request against `url` on the shared client.
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Execute an HTTP request with a per-request timeout.
    ///
    /// # Errors
    ///
    /// - `BackendError::ProviderAuth` for 401/403
    /// - `BackendError::ProviderQuota` for 429
    /// - `BackendError::ProviderOutage` for 5xx
    /// - `BackendError::Timeout` when the request times out
    /// - `BackendError::Transport` for other client or network errors
    pub async fn execute(
        &self,
        request_builder: reqwest::RequestBuilder,
        request_timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, BackendError> {
        let effective_timeout = request_timeout.min(MAX_HTTP_TIMEOUT);

        let request = request_builder
            .timeout(effective_timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to build request: {e}")))?;

        debug!(
            provider = provider_name,
            timeout_secs = effective_timeout.as_secs(),
            "Executing HTTP request"
        );

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                if status.is_client_error() {
                    return Err(map_client_error(status, provider_name));
                }
                if status.is_server_error() {
                    return Err(BackendError::ProviderOutage(format!(
                        "{provider_name} returned server error: {status}"
                    )));
                }
                Ok(response)
            }
            Err(e) if e.is_timeout() => Err(BackendError::Timeout {
                duration: effective_timeout,
            }),
            Err(e) => Err(BackendError::Transport(format!(
                "{provider_name} request failed: {e}"
            ))),
        }
    }
}

/// Map a 4xx status code to a typed backend error.
fn map_client_error(status: StatusCode, provider_name: &str) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::ProviderAuth(format!(
            "{provider_name} rejected credentials: {status}"
        )),
        StatusCode::TOO_MANY_REQUESTS => BackendError::ProviderQuota(format!(
            "{provider_name} rate limit exceeded: {status}"
        )),
        _ => BackendError::Transport(format!("{provider_name} returned client error: {status}")),
    }
}
