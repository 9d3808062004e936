//! Data sources that map arguments straight to a URL.
//!
//! Each simple source is a [`FetcherDataSource`] driven by a
//! [`SimpleEndpoint`]: a pure URL builder and an optional pure
//! post-processor.

use robloxapi_core::{ArgumentSpecification, ArgumentType, Arguments};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::endpoint::{Endpoint, FetcherDataSource};
use crate::fetcher::Fetcher;

/// Builds the endpoint URL from validated arguments.
pub type BuildEndpoint = fn(&Arguments) -> String;

/// Extracts the result from a decoded response.
pub type PostProcess = fn(Value) -> Option<Value>;

/// Endpoint strategy made of plain functions.
#[derive(Clone, Copy)]
pub struct SimpleEndpoint {
    build: BuildEndpoint,
    post_process: Option<PostProcess>,
}

impl SimpleEndpoint {
    /// Creates a strategy that returns the response unchanged.
    #[must_use]
    pub const fn new(build: BuildEndpoint) -> Self {
        Self {
            build,
            post_process: None,
        }
    }

    /// Adds a post-processor.
    #[must_use]
    pub const fn with_post_process(mut self, post_process: PostProcess) -> Self {
        self.post_process = Some(post_process);
        self
    }
}

impl fmt::Debug for SimpleEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleEndpoint")
            .field("post_process", &self.post_process.is_some())
            .finish_non_exhaustive()
    }
}

impl Endpoint for SimpleEndpoint {
    fn build_endpoint(&self, args: &Arguments) -> String {
        (self.build)(args)
    }

    fn post_process(&self, value: Value, _args: &Arguments) -> Option<Value> {
        match self.post_process {
            Some(post_process) => post_process(value),
            None => Some(value),
        }
    }
}

/// A data source driven by a [`SimpleEndpoint`].
pub type SimpleDataSource = FetcherDataSource<SimpleEndpoint>;

/// Default page size of `userGames`.
pub const DEFAULT_USER_GAMES_LIMIT: &str = "50";

/// Default sort order of `userGames`.
pub const DEFAULT_SORT_ORDER: &str = "Asc";

fn data_field(mut value: Value) -> Option<Value> {
    value.get_mut("data").map(Value::take)
}

fn single(arg_type: ArgumentType) -> ArgumentSpecification {
    ArgumentSpecification::new([arg_type]).with_json_args()
}

/// Creates every simple data source.
#[must_use]
pub fn simple_sources(fetcher: &Arc<Fetcher>) -> Vec<SimpleDataSource> {
    let source = |id: &str, spec: ArgumentSpecification, endpoint: SimpleEndpoint| {
        FetcherDataSource::new(id, spec, endpoint, Arc::clone(fetcher))
    };

    vec![
        source(
            "groupRoles",
            single(ArgumentType::UserId),
            SimpleEndpoint::new(|args| {
                format!("https://groups.roblox.com/v1/users/{}/groups/roles", args.required(0))
            })
            .with_post_process(data_field),
        )
        .with_legacy_alias(),
        source(
            "groupData",
            single(ArgumentType::GroupId),
            SimpleEndpoint::new(|args| {
                format!("https://groups.roblox.com/v1/groups/{}", args.required(0))
            }),
        )
        .with_legacy_alias(),
        source(
            "groupRolesList",
            single(ArgumentType::GroupId),
            SimpleEndpoint::new(|args| {
                format!("https://groups.roblox.com/v1/groups/{}/roles", args.required(0))
            }),
        ),
        source(
            "badgeInfo",
            single(ArgumentType::BadgeId),
            SimpleEndpoint::new(|args| {
                format!("https://badges.roblox.com/v1/badges/{}", args.required(0))
            }),
        )
        .with_legacy_alias(),
        source(
            "userInfo",
            single(ArgumentType::UserId),
            SimpleEndpoint::new(|args| {
                format!("https://users.roblox.com/v1/users/{}", args.required(0))
            }),
        )
        .with_legacy_alias(),
        source(
            "assetDetails",
            single(ArgumentType::AssetId),
            SimpleEndpoint::new(|args| {
                format!("https://economy.roblox.com/v2/assets/{}/details", args.required(0))
            }),
        )
        .with_legacy_alias(),
        source(
            "gameNameDescription",
            single(ArgumentType::UniverseId),
            SimpleEndpoint::new(|args| {
                format!(
                    "https://gameinternationalization.roblox.com/v1/name-description/games/{}",
                    args.required(0)
                )
            }),
        ),
        source(
            "universeInfo",
            single(ArgumentType::UniverseId),
            SimpleEndpoint::new(|args| {
                format!("https://develop.roblox.com/v1/universes/{}", args.required(0))
            }),
        ),
        source(
            "userGames",
            single(ArgumentType::UserId)
                .with_optional("limit", ArgumentType::UserGamesLimit)
                .with_optional("sort_order", ArgumentType::SortOrder),
            SimpleEndpoint::new(|args| {
                format!(
                    "https://games.roblox.com/v2/users/{}/games?limit={}&sortOrder={}",
                    args.required(0),
                    args.optional_or("limit", DEFAULT_USER_GAMES_LIMIT),
                    args.optional_or("sort_order", DEFAULT_SORT_ORDER)
                )
            })
            .with_post_process(data_field),
        ),
    ]
}
