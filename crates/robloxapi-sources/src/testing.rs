//! Scripted transport for tests.
//!
//! Available in unit tests and, through the `test-utils` feature, to
//! downstream crates.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A transport that answers from a fixed table keyed by URL.
///
/// Unknown URLs answer `404` with an empty body. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a transport without scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `url` with `status` and a raw body.
    #[must_use]
    pub fn with_body(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.script(url, Ok(HttpResponse::new(status, body)));
        self
    }

    /// Answers `url` with `200` and a JSON body.
    #[must_use]
    pub fn with_json(self, url: impl Into<String>, body: &Value) -> Self {
        self.with_body(url, 200, body.to_string())
    }

    /// Fails requests to `url` before any response is received.
    #[must_use]
    pub fn with_error(self, url: impl Into<String>, error: TransportError) -> Self {
        self.script(url, Err(error));
        self
    }

    /// Replaces the scripted answer for `url`.
    pub fn script(&self, url: impl Into<String>, response: Result<HttpResponse, TransportError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), response);
    }

    /// Returns every request sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of requests sent so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "")));

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        response
    }
}
