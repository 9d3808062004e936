//! Cached access to Roblox API endpoints.

use robloxapi_core::{ApiError, Arguments, Config, Result, ResultCache};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

/// Per-source adjustments to an outbound request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Request method.
    pub method: HttpMethod,
    /// Request body.
    pub body: Option<String>,
    /// Headers added after the defaults.
    pub headers: Vec<(String, String)>,
}

/// Fetches JSON from Roblox API endpoints through the result cache.
///
/// A fetcher performs at most one request per call. Successful responses are
/// cached with the expiry configured for the calling data source.
#[derive(Debug, Clone)]
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn ResultCache>,
    config: Arc<Config>,
}

impl Fetcher {
    /// Creates a fetcher.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn ResultCache>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            transport,
            cache,
            config,
        }
    }

    /// Returns the configuration the fetcher was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the cached value for `endpoint`, or fetches and caches it.
    ///
    /// # Errors
    /// - [`ApiError::RequestFailed`] if the request cannot be sent or answers
    ///   with a non-success status
    /// - [`ApiError::DecodeFailure`] if the body is empty or not valid JSON
    #[instrument(skip(self, args, options), fields(source = %source_id, endpoint = %endpoint))]
    pub async fn fetch_json(
        &self,
        source_id: &str,
        endpoint: &str,
        args: &Arguments,
        options: RequestOptions,
    ) -> Result<Value> {
        match self.cache.get(endpoint, args).await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            // A broken cache degrades to uncached requests.
            Err(e) => warn!(error = %e, "Cache lookup failed"),
        }

        let request = self.build_request(endpoint, options);
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Failed to fetch data from Roblox API");
            ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                status: None,
            }
        })?;

        if !response.is_success() {
            warn!(
                status = response.status,
                content = %response.body,
                "Failed to fetch data from Roblox API"
            );
            return Err(ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                status: Some(response.status),
            });
        }

        let value: Value = serde_json::from_str(&response.body).map_err(|e| {
            debug!(error = %e, "Response is not valid JSON");
            ApiError::DecodeFailure
        })?;
        if value.is_null() {
            return Err(ApiError::DecodeFailure);
        }

        let expiry = self.config.caching_expiry(source_id);
        if let Err(e) = self.cache.put(endpoint, args, &value, expiry).await {
            warn!(error = %e, "Failed to cache response");
        }

        Ok(value)
    }

    fn build_request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        let mut request = HttpRequest::get(endpoint);
        request.timeout = self.config.request_timeout();

        if let Some(user_agent) = self.config.user_agent() {
            request.set_header("User-Agent", user_agent);
        }

        request.method = options.method;
        request.body = options.body;
        request.set_header("Accept", "application/json");

        for (name, value) in options.headers {
            request.set_header(name, value);
        }

        request
    }
}
