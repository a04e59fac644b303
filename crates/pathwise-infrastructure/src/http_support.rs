//! Shared plumbing for the HTTP collaborator clients.

use pathwise_core::error::{PathwiseError, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default per-request timeout of the collaborator clients.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL plus a reusable client.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub(crate) client: Client,
    base_url: String,
    collaborator: &'static str,
    timeout: Duration,
}

impl Endpoint {
    pub(crate) fn new(collaborator: &'static str, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            collaborator,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends the request and decodes a JSON body from a 2xx response.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                target: "pathwise::collaborator",
                collaborator = self.collaborator,
                %status,
                "Collaborator returned an error"
            );
            return Err(PathwiseError::unavailable(
                self.collaborator,
                format!("HTTP {}: {}", status, error_text),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PathwiseError::unavailable(self.collaborator, format!("bad response body: {}", e)))
    }

    fn transport_error(&self, e: reqwest::Error) -> PathwiseError {
        if e.is_timeout() {
            PathwiseError::timeout(self.collaborator, self.timeout.as_millis() as u64)
        } else {
            PathwiseError::unavailable(self.collaborator, format!("request failed: {}", e))
        }
    }
}
