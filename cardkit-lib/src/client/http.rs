//! `reqwest` implementation of [`ClientTransport`].

use async_trait::async_trait;
use serde_json::Value;
#[cfg(feature = "http-client")]
use std::time::Duration;

use super::{ApiResponse, ClientTransport};
use crate::config::SessionConfig;
#[cfg(not(feature = "http-client"))]
use crate::CardkitError;
use crate::Result;

/// HTTP transport for one client session.
///
/// Every request carries the session's `Authorization` header.
pub struct HttpTransport {
    base_url: String,
    authorization: String,
    timeout_secs: u64,
    #[cfg(feature = "http-client")]
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the given session configuration.
    #[cfg(feature = "http-client")]
    pub fn new(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                crate::CardkitError::Internal(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url: config.base_url(),
            authorization: config.authorization(),
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    /// Create a transport for the given session configuration (stub when feature disabled).
    #[cfg(not(feature = "http-client"))]
    pub fn new(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base_url: config.base_url(),
            authorization: config.authorization(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Root of the customer's client API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout in milliseconds, as reported in timeout errors.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_secs.saturating_mul(1000)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Read a response into an [`ApiResponse`]. Non-JSON bodies are kept as a string.
    #[cfg(feature = "http-client")]
    async fn read_response(&self, response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse::new(status, body))
    }

    /// Map reqwest errors to CardkitError.
    #[cfg(feature = "http-client")]
    fn map_reqwest_error(&self, e: reqwest::Error) -> crate::CardkitError {
        if e.is_timeout() {
            crate::CardkitError::ConnectionTimeout {
                operation: "client API request".to_string(),
                timeout_ms: self.timeout_ms(),
            }
        } else {
            crate::CardkitError::transport(e)
        }
    }
}

#[cfg(feature = "http-client")]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ClientTransport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", &self.authorization)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.read_response(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", &self.authorization)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.read_response(response).await
    }
}

#[cfg(not(feature = "http-client"))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ClientTransport for HttpTransport {
    async fn get(&self, _path: &str, _query: &[(&str, String)]) -> Result<ApiResponse> {
        Err(CardkitError::Unimplemented(
            "HTTP client (enable the 'http-client' feature)",
        ))
    }

    async fn post(&self, _path: &str, _body: &Value) -> Result<ApiResponse> {
        Err(CardkitError::Unimplemented(
            "HTTP client (enable the 'http-client' feature)",
        ))
    }
}
