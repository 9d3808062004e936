//! The `userId` data source.

use robloxapi_core::{ArgumentSpecification, ArgumentType, Arguments};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::endpoint::{Endpoint, FetcherDataSource};
use crate::fetcher::{Fetcher, RequestOptions};
use crate::transport::HttpMethod;

/// Resolves a username to a user ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserIdEndpoint;

impl Endpoint for UserIdEndpoint {
    fn build_endpoint(&self, _args: &Arguments) -> String {
        "https://users.roblox.com/v1/usernames/users".to_string()
    }

    fn post_process(&self, mut value: Value, _args: &Arguments) -> Option<Value> {
        value.pointer_mut("/data/0/id").map(Value::take)
    }

    fn additional_headers(&self, _args: &Arguments) -> Vec<(String, String)> {
        vec![("Content-Type".to_string(), "application/json".to_string())]
    }

    fn customize_request(&self, args: &Arguments, options: &mut RequestOptions) {
        options.method = HttpMethod::Post;
        options.body = Some(json!({ "usernames": [args.required(0)] }).to_string());
    }
}

/// Creates the `userId` data source.
#[must_use]
pub fn user_id(fetcher: Arc<Fetcher>) -> FetcherDataSource<UserIdEndpoint> {
    let spec = ArgumentSpecification::new([ArgumentType::Username]);
    FetcherDataSource::new("userId", spec, UserIdEndpoint, fetcher)
}
