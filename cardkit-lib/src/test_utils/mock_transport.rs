//! In-memory client API for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiResponse, ClientTransport};
use crate::Result;

/// A request seen by [`MockTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Value,
}

/// Canned responses keyed by method and path. Unknown routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<(&'static str, String), ApiResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, path: &str, body: Value) -> Self {
        self.on_get_status(path, 200, body)
    }

    pub fn on_get_status(mut self, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .insert(("GET", path.to_string()), ApiResponse::new(status, body));
        self
    }

    pub fn on_post(self, path: &str, body: Value) -> Self {
        self.on_post_status(path, 200, body)
    }

    pub fn on_post_status(mut self, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .insert(("POST", path.to_string()), ApiResponse::new(status, body));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, request: RecordedRequest) -> ApiResponse {
        let response = self
            .routes
            .get(&(request.method, request.path.clone()))
            .cloned()
            .unwrap_or_else(|| ApiResponse::new(404, Value::Null));
        self.requests.lock().unwrap().push(request);
        response
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ClientTransport for MockTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        Ok(self.respond(RecordedRequest {
            method: "GET",
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: Value::Null,
        }))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        Ok(self.respond(RecordedRequest {
            method: "POST",
            path: path.to_string(),
            query: Vec::new(),
            body: body.clone(),
        }))
    }
}
