//! Data sources backed by a single API endpoint.

use async_trait::async_trait;
use robloxapi_core::{ApiError, ArgumentSpecification, Arguments, DataSource, Result};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

use crate::fetcher::{Fetcher, RequestOptions};

/// How a data source talks to its endpoint.
pub trait Endpoint: Send + Sync + Debug {
    /// Builds the endpoint URL from validated arguments.
    fn build_endpoint(&self, args: &Arguments) -> String;

    /// Extracts the result from the decoded response.
    ///
    /// Returning `None` signals that the response does not contain usable data.
    fn post_process(&self, value: Value, _args: &Arguments) -> Option<Value> {
        Some(value)
    }

    /// Headers sent in addition to the defaults.
    fn additional_headers(&self, _args: &Arguments) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Adjusts method and body of the request.
    fn customize_request(&self, _args: &Arguments, _options: &mut RequestOptions) {}
}

/// A data source that fetches one endpoint and post-processes the response.
#[derive(Debug)]
pub struct FetcherDataSource<E> {
    id: String,
    spec: ArgumentSpecification,
    legacy: bool,
    endpoint: E,
    fetcher: Arc<Fetcher>,
}

impl<E: Endpoint> FetcherDataSource<E> {
    /// Creates a data source.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        spec: ArgumentSpecification,
        endpoint: E,
        fetcher: Arc<Fetcher>,
    ) -> Self {
        Self {
            id: id.into(),
            spec,
            legacy: false,
            endpoint,
            fetcher,
        }
    }

    /// Exposes the data source under its legacy alias as well.
    #[must_use]
    pub const fn with_legacy_alias(mut self) -> Self {
        self.legacy = true;
        self
    }

    /// Returns the endpoint strategy.
    #[must_use]
    pub const fn endpoint(&self) -> &E {
        &self.endpoint
    }
}

#[async_trait]
impl<E: Endpoint> DataSource for FetcherDataSource<E> {
    fn id(&self) -> &str {
        &self.id
    }

    fn argument_specification(&self) -> &ArgumentSpecification {
        &self.spec
    }

    async fn exec(&self, args: &Arguments) -> Result<Value> {
        let url = self.endpoint.build_endpoint(args);

        let mut options = RequestOptions::default();
        self.endpoint.customize_request(args, &mut options);
        options
            .headers
            .extend(self.endpoint.additional_headers(args));

        let response = self.fetcher.fetch_json(&self.id, &url, args, options).await?;

        match self.endpoint.post_process(response, args) {
            None | Some(Value::Null) => {
                debug!(source = %self.id, "Response contains no usable data");
                Err(ApiError::InvalidData)
            }
            Some(Value::String(s)) if s.is_empty() => Err(ApiError::InvalidData),
            Some(value) => Ok(value),
        }
    }

    fn registers_legacy_alias(&self) -> bool {
        self.legacy
    }
}
