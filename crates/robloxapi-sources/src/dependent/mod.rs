//! Data sources derived from other data sources.
//!
//! A dependent data source resolves its dependency once, when it is
//! constructed, and fails with [`ApiError::DataSourceNotFound`] if the
//! dependency is not registered. At call time it runs the dependency and
//! derives its own value from the result.

use async_trait::async_trait;
use robloxapi_core::{
    ApiError, ArgumentSpecification, Arguments, DataSource, Result, SourceResolver,
};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

pub mod group;
pub mod place;
pub mod thumbnail_url;
pub mod user_place_visits;

/// How a dependent data source turns its dependency's value into its own.
pub trait Derivation: Send + Sync + Debug {
    /// Arguments passed to the dependency. Defaults to the caller's arguments.
    fn dependency_args(&self, args: &Arguments) -> Arguments {
        args.clone()
    }

    /// Derives the result from the dependency's value.
    fn derive(&self, value: Value, args: &Arguments) -> Result<Value>;
}

/// A data source computed from another data source.
#[derive(Debug)]
pub struct DependentDataSource<D> {
    id: String,
    spec: ArgumentSpecification,
    legacy: bool,
    dependency: Arc<dyn DataSource>,
    derivation: D,
}

impl<D: Derivation> DependentDataSource<D> {
    /// Creates a dependent data source on top of a resolved dependency.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        spec: ArgumentSpecification,
        dependency: Arc<dyn DataSource>,
        derivation: D,
    ) -> Self {
        Self {
            id: id.into(),
            spec,
            legacy: false,
            dependency,
            derivation,
        }
    }

    /// Exposes the data source under its legacy alias as well.
    #[must_use]
    pub fn with_legacy_alias(mut self) -> Self {
        self.legacy = true;
        self
    }

    /// Returns the data source this one depends on.
    #[must_use]
    pub fn dependency(&self) -> &Arc<dyn DataSource> {
        &self.dependency
    }
}

#[async_trait]
impl<D: Derivation> DataSource for DependentDataSource<D> {
    fn id(&self) -> &str {
        &self.id
    }

    fn argument_specification(&self) -> &ArgumentSpecification {
        &self.spec
    }

    async fn exec(&self, args: &Arguments) -> Result<Value> {
        let dependency_args = self.derivation.dependency_args(args);
        let value = self.dependency.exec(&dependency_args).await?;
        self.derivation.derive(value, args)
    }

    fn registers_legacy_alias(&self) -> bool {
        self.legacy
    }

    fn fetcher_source_id(&self) -> &str {
        self.dependency.fetcher_source_id()
    }
}

/// Builds a dependent data source, resolving its dependency.
pub type DependentFactory = fn(&dyn SourceResolver) -> Result<Arc<dyn DataSource>>;

/// Every dependent data source, in registration order.
pub const DEPENDENT_SOURCES: &[(&str, DependentFactory)] = &[
    ("groupRank", group::group_rank),
    ("placeActivePlayers", place::place_active_players),
    ("placeVisits", place::place_visits),
    ("groupMembers", group::group_members),
    ("userAvatarThumbnailUrl", thumbnail_url::user_avatar_thumbnail_url),
    ("assetThumbnailUrl", thumbnail_url::asset_thumbnail_url),
    ("gameIconUrl", thumbnail_url::game_icon_url),
    ("userPlaceVisits", user_place_visits::user_place_visits),
];

/// Returns the named field of an object.
///
/// # Errors
/// - [`ApiError::NoData`] if `value` is null
/// - [`ApiError::UnexpectedDataStructure`] if `value` has no such field
pub(crate) fn field(mut value: Value, name: &str) -> Result<Value> {
    if value.is_null() {
        return Err(ApiError::NoData);
    }
    value
        .get_mut(name)
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or(ApiError::UnexpectedDataStructure)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A dependency returning a fixed value and recording its arguments.
    #[derive(Debug)]
    pub(crate) struct Fixed {
        pub(crate) id: &'static str,
        pub(crate) spec: ArgumentSpecification,
        pub(crate) value: Result<Value>,
        pub(crate) calls: Mutex<Vec<Arguments>>,
    }

    impl Fixed {
        pub(crate) fn new(id: &'static str, value: Value) -> Arc<Self> {
            Arc::new(Self {
                id,
                spec: ArgumentSpecification::default().with_json_args(),
                value: Ok(value),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(id: &'static str, error: ApiError) -> Arc<Self> {
            Arc::new(Self {
                id,
                spec: ArgumentSpecification::default(),
                value: Err(error),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> Vec<Arguments> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DataSource for Fixed {
        fn id(&self) -> &str {
            self.id
        }

        fn argument_specification(&self) -> &ArgumentSpecification {
            &self.spec
        }

        async fn exec(&self, args: &Arguments) -> Result<Value> {
            self.calls.lock().unwrap().push(args.clone());
            self.value.clone()
        }
    }

    /// Resolver over a fixed set of sources.
    pub(crate) struct Resolver(pub(crate) HashMap<String, Arc<dyn DataSource>>);

    impl Resolver {
        pub(crate) fn with(source: Arc<dyn DataSource>) -> Self {
            Self(HashMap::from([(source.id().to_string(), source)]))
        }

        pub(crate) fn empty() -> Self {
            Self(HashMap::new())
        }
    }

    impl SourceResolver for Resolver {
        fn resolve(&self, id: &str, _ignore_case: bool) -> Option<Arc<dyn DataSource>> {
            self.0.get(id).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{Fixed, Resolver};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field() {
        assert_eq!(field(json!({"a": 1}), "a"), Ok(json!(1)));
        assert_eq!(field(json!({"a": 1}), "b"), Err(ApiError::UnexpectedDataStructure));
        assert_eq!(field(json!({"a": null}), "a"), Err(ApiError::UnexpectedDataStructure));
        assert_eq!(field(Value::Null, "a"), Err(ApiError::NoData));
        assert_eq!(field(json!(5), "a"), Err(ApiError::UnexpectedDataStructure));
    }

    #[tokio::test]
    async fn test_factories_require_their_dependency() {
        for (id, factory) in DEPENDENT_SOURCES {
            let err = factory(&Resolver::empty()).unwrap_err();
            assert!(matches!(err, ApiError::DataSourceNotFound(_)), "{id}");
        }
    }

    #[tokio::test]
    async fn test_factories_produce_their_ids() {
        for (id, factory) in DEPENDENT_SOURCES {
            let mut resolver = Resolver::empty();
            for dependency in [
                "groupRoles",
                "groupData",
                "gameData",
                "userGames",
                "userAvatarThumbnail",
                "assetThumbnail",
                "gameIcon",
            ] {
                resolver
                    .0
                    .insert(dependency.into(), Fixed::new(dependency, json!(null)));
            }

            let source = factory(&resolver).unwrap();
            assert_eq!(source.id(), *id);
        }
    }

    #[tokio::test]
    async fn test_reports_dependency_fetcher_id() {
        let resolver = Resolver::with(Fixed::new("groupData", json!({"memberCount": 3})));
        let source = group::group_members(&resolver).unwrap();
        assert_eq!(source.fetcher_source_id(), "groupData");
        assert_eq!(
            source.exec(&Arguments::required_only(["1"])).await.unwrap(),
            json!(3)
        );
    }
}
