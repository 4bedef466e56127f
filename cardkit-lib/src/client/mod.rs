//! Client API access.
//!
//! [`Session`] is the entry point: it fetches payment products, public keys
//! and IIN details for one client session and prepares payment requests.
//! HTTP is abstracted behind [`ClientTransport`]; [`HttpTransport`] is the
//! `reqwest` implementation.
//!
//! # Feature Flags
//!
//! [`HttpTransport`] needs the `http-client` feature for actual HTTP
//! requests. Without it, all requests return an `Unimplemented` error.
//!
//! ```toml
//! [dependencies]
//! cardkit-lib = { version = "1.0", features = ["http-client"] }
//! ```

mod http;
mod session;

pub use http::HttpTransport;
pub use session::Session;

use async_trait::async_trait;
use serde_json::Value;

use crate::{CardkitError, Result};

/// Status code and JSON body of a client API response.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a successful response, or the error its status maps to.
    pub fn into_result(self, resource: &str) -> Result<Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(map_status_error(self.status, resource, &self.body))
        }
    }
}

/// Request/response access to the client API.
///
/// Paths are relative to the customer's API root, e.g. `products/1`.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ClientTransport {
    /// GET `path` with the given query parameters.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse>;

    /// POST a JSON `body` to `path`.
    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse>;
}

/// Map a non-success status code to a [`CardkitError`].
pub fn map_status_error(status: u16, resource: &str, body: &Value) -> CardkitError {
    let detail = error_detail(body);
    match status {
        400 => CardkitError::invalid_data(resource, detail),
        401 | 403 => CardkitError::Auth(format!("{resource}: {detail}")),
        404 => CardkitError::not_found(resource, detail),
        429 => CardkitError::RateLimited {
            retry_after_ms: 5000,
        },
        500..=599 => CardkitError::Internal(format!("server error ({status}) on {resource}: {detail}")),
        _ => CardkitError::Transport(format!("{resource} request failed ({status}): {detail}")),
    }
}

/// First error message in a client API error body, or the raw body.
fn error_detail(body: &Value) -> String {
    body.get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|e| e.get("message").or_else(|| e.get("id")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| match body {
            Value::Null => String::new(),
            other => other.to_string(),
        })
}
