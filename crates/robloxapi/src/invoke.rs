//! Invocation boundary between the host and the data sources.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use robloxapi_cache::{InMemoryCache, NoopCache};
use robloxapi_core::{
    ApiError, ArgumentValidator, Arguments, Config, ConfigError, DataSource, Output, Result,
    ResultCache, SourceResolver,
};
use robloxapi_sources::{Fetcher, HttpTransport, ReqwestTransport};

use crate::registry::DataSourceRegistry;
use crate::usage::UsageTracker;

/// Entry point for calling data sources by ID with raw string arguments.
///
/// Cloning is cheap; all state is shared.
///
/// # Example
///
/// ```rust,ignore
/// use robloxapi::{Config, RobloxApi};
///
/// let api = RobloxApi::new(Config::default())?;
/// let output = api.invoke("userId", &["builderman"]).await?;
/// assert_eq!(output.to_string(), "156");
/// ```
#[derive(Clone)]
pub struct RobloxApi {
    registry: Arc<DataSourceRegistry>,
    validator: Arc<ArgumentValidator>,
    config: Arc<Config>,
}

impl fmt::Debug for RobloxApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobloxApi")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl RobloxApi {
    /// Build the service from configuration, with the reqwest transport and
    /// an in-memory cache (no cache if `disable_cache` is set).
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: Config) -> std::result::Result<Self, ConfigError> {
        let cache: Arc<dyn ResultCache> = if config.disable_cache {
            Arc::new(NoopCache::new())
        } else {
            Arc::new(InMemoryCache::new())
        };
        Self::with_components(config, Arc::new(ReqwestTransport::new()), cache)
    }

    /// Build the service from configuration with the given transport and cache.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn with_components(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn ResultCache>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let validator = ArgumentValidator::from_config(&config)?;
        let config = Arc::new(config);

        let fetcher = Arc::new(Fetcher::new(transport, cache, Arc::clone(&config)));
        let registry = DataSourceRegistry::with_defaults(&config, fetcher);

        Ok(Self::from_parts(config, registry, validator))
    }

    /// Assemble the service from already built parts.
    #[must_use]
    pub fn from_parts(
        config: Arc<Config>,
        registry: DataSourceRegistry,
        validator: ArgumentValidator,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            validator: Arc::new(validator),
            config,
        }
    }

    /// Returns the data source registry.
    #[must_use]
    pub fn registry(&self) -> &DataSourceRegistry {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Call the data source `id` with raw arguments.
    ///
    /// The ID is matched case-insensitively.
    ///
    /// # Errors
    /// - [`ApiError::DataSourceNotFound`] if no such source is registered
    /// - any validation error of the arguments
    /// - any error of the data source itself
    pub async fn invoke<S: AsRef<str>>(&self, id: &str, raw_args: &[S]) -> Result<Output> {
        let source = self.resolve(id)?;
        self.call(&source, raw_args).await
    }

    /// Like [`RobloxApi::invoke`], but the first token is the data source ID.
    ///
    /// # Errors
    /// Returns [`ApiError::NoArguments`] if `tokens` is empty, otherwise the
    /// errors of [`RobloxApi::invoke`].
    pub async fn invoke_raw<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Output> {
        let (id, rest) = tokens.split_first().ok_or(ApiError::NoArguments)?;
        self.invoke(id.as_ref().trim(), rest).await
    }

    /// Like [`RobloxApi::invoke`], but counts the call in `tracker` and
    /// enforces the configured usage limits first.
    ///
    /// # Errors
    /// Returns [`ApiError::UsageLimit`] or [`ApiError::UsageLimitDependent`]
    /// once a limit is exceeded, otherwise the errors of [`RobloxApi::invoke`].
    pub async fn invoke_tracked<S: AsRef<str>>(
        &self,
        tracker: &mut UsageTracker,
        id: &str,
        raw_args: &[S],
    ) -> Result<Output> {
        let source = self.resolve(id)?;
        tracker.record(source.as_ref(), &self.config.usage_limits)?;
        self.call(&source, raw_args).await
    }

    /// Returns the legacy single-purpose functions keyed by alias.
    ///
    /// Empty unless `register_legacy_aliases` is enabled.
    #[must_use]
    pub fn legacy_functions(&self) -> BTreeMap<String, LegacyFunction> {
        if !self.config.register_legacy_aliases {
            return BTreeMap::new();
        }

        self.registry
            .legacy_aliases()
            .into_iter()
            .map(|(alias, source)| {
                let function = LegacyFunction {
                    alias: alias.clone(),
                    source,
                    validator: Arc::clone(&self.validator),
                    config: Arc::clone(&self.config),
                };
                (alias, function)
            })
            .collect()
    }

    fn resolve(&self, id: &str) -> Result<Arc<dyn DataSource>> {
        self.registry
            .resolve(id, true)
            .ok_or_else(|| ApiError::DataSourceNotFound(id.to_string()))
    }

    #[instrument(skip(self, source, raw_args), fields(source = %source.id()))]
    async fn call<S: AsRef<str>>(
        &self,
        source: &Arc<dyn DataSource>,
        raw_args: &[S],
    ) -> Result<Output> {
        let args = self
            .validator
            .validate(source.argument_specification(), raw_args)?;
        let value = source.exec(&args).await.inspect_err(|e| {
            debug!(error = %e, code = e.code(), "Data source call failed");
        })?;
        Ok(Output::from_value(value, &args))
    }
}

/// A data source exposed under its legacy alias, e.g. `roblox_GameData`.
///
/// Arrays and objects are always returned as compact JSON; `pretty` and
/// `json_key` have no effect.
#[derive(Clone)]
pub struct LegacyFunction {
    alias: String,
    source: Arc<dyn DataSource>,
    validator: Arc<ArgumentValidator>,
    config: Arc<Config>,
}

impl fmt::Debug for LegacyFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyFunction")
            .field("alias", &self.alias)
            .field("source", &self.source.id())
            .finish_non_exhaustive()
    }
}

impl LegacyFunction {
    /// Returns the alias.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the wrapped data source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// Call the wrapped data source with raw arguments.
    ///
    /// # Errors
    /// Returns any validation error or error of the data source.
    pub async fn call<S: AsRef<str>>(&self, raw_args: &[S]) -> Result<Output> {
        let args = self
            .validator
            .validate(self.source.argument_specification(), raw_args)?;
        let value = self.source.exec(&args).await?;
        Ok(Output::from_value(value, &Arguments::default()))
    }

    /// Like [`LegacyFunction::call`], but counts the call in `tracker` and
    /// enforces the configured usage limits first.
    ///
    /// # Errors
    /// Returns a usage limit error, otherwise the errors of [`LegacyFunction::call`].
    pub async fn call_tracked<S: AsRef<str>>(
        &self,
        tracker: &mut UsageTracker,
        raw_args: &[S],
    ) -> Result<Output> {
        tracker.record(self.source.as_ref(), &self.config.usage_limits)?;
        self.call(raw_args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robloxapi_core::ArgumentType;
    use robloxapi_sources::testing::MockTransport;
    use serde_json::json;

    const GAME_URL: &str = "https://games.roblox.com/v1/games?universeIds=1";
    const USER_ID_URL: &str = "https://users.roblox.com/v1/usernames/users";

    fn game() -> serde_json::Value {
        json!({"data": [{"id": 1, "rootPlaceId": 132, "name": "Doors", "playing": 17, "visits": 9000}]})
    }

    fn api_with(config: Config, transport: MockTransport) -> (RobloxApi, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let api = RobloxApi::with_components(
            config,
            transport.clone(),
            Arc::new(InMemoryCache::new()),
        )
        .unwrap();
        (api, transport)
    }

    fn api(transport: MockTransport) -> (RobloxApi, Arc<MockTransport>) {
        api_with(Config::default(), transport)
    }

    #[tokio::test]
    async fn test_invoke_scalar() {
        let (api, transport) = api(MockTransport::new().with_json(
            USER_ID_URL,
            &json!({"data": [{"id": 156, "name": "builderman"}]}),
        ));

        let output = api.invoke("userId", &["builderman"]).await.unwrap();
        assert_eq!(output, Output::Text("156".into()));

        let request = &transport.requests()[0];
        assert_eq!(
            request.body.as_deref(),
            Some(r#"{"usernames":["builderman"]}"#)
        );
    }

    #[tokio::test]
    async fn test_invoke_is_case_insensitive() {
        let (api, _) = api(MockTransport::new().with_json(GAME_URL, &game()));
        let output = api.invoke("PLACEVISITS", &["1", "132"]).await.unwrap();
        assert_eq!(output.to_string(), "9000");
    }

    #[tokio::test]
    async fn test_invoke_formats_json() {
        let (api, _) = api(MockTransport::new().with_json(GAME_URL, &game()));

        let output = api
            .invoke("gameData", &["1", "132", "json_key=name"])
            .await
            .unwrap();
        assert_eq!(output, Output::Text("Doors".into()));

        let output = api.invoke("gameData", &["1", "132"]).await.unwrap();
        assert!(output.is_json());

        let output = api
            .invoke("gameData", &["1", "132", "pretty=true"])
            .await
            .unwrap();
        assert!(output.to_string().contains('\n'));
    }

    #[tokio::test]
    async fn test_invoke_errors() {
        let (api, transport) = api(MockTransport::new());

        assert_eq!(
            api.invoke("nope", &["1"]).await.unwrap_err(),
            ApiError::DataSourceNotFound("nope".into())
        );
        assert_eq!(
            api.invoke_raw::<&str>(&[]).await.unwrap_err(),
            ApiError::NoArguments
        );
        assert_eq!(
            api.invoke("gameData", &["1"]).await.unwrap_err(),
            ApiError::MissingArgument(ArgumentType::PlaceId)
        );
        assert_eq!(
            api.invoke("gameData", &["abc", "132"]).await.unwrap_err(),
            ApiError::InvalidArgument {
                arg_type: ArgumentType::UniverseId,
                value: "abc".into()
            }
        );
        // validation failures never reach the network
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_invoke_raw() {
        let (api, _) = api(MockTransport::new().with_json(GAME_URL, &game()));
        let output = api
            .invoke_raw(&["placeActivePlayers", "1", "132"])
            .await
            .unwrap();
        assert_eq!(output.to_string(), "17");
    }

    #[tokio::test]
    async fn test_allowed_arguments() {
        let config = Config::from_toml_str(
            r#"
            [allowed_arguments]
            UniverseID = ["2"]
            "#,
        )
        .unwrap();
        let (api, _) = api_with(config, MockTransport::new());

        assert_eq!(
            api.invoke("gameData", &["1", "132"]).await.unwrap_err(),
            ApiError::ArgNotAllowed {
                arg_type: ArgumentType::UniverseId,
                value: "1".into()
            }
        );
    }

    #[test]
    fn test_unknown_allowed_argument_type_fails_at_startup() {
        let mut config = Config::default();
        config
            .allowed_arguments
            .insert("NotAType".into(), vec!["1".into()]);

        let err = RobloxApi::with_components(
            config,
            Arc::new(MockTransport::new()),
            Arc::new(NoopCache::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownArgumentType(_)));
    }

    #[tokio::test]
    async fn test_invoke_tracked() {
        let mut config = Config::default();
        config.usage_limits.insert("gameData".into(), 1);
        let (api, _) = api_with(config, MockTransport::new().with_json(GAME_URL, &game()));
        let mut tracker = UsageTracker::new();

        api.invoke_tracked(&mut tracker, "gameData", &["1", "132"])
            .await
            .unwrap();
        assert_eq!(
            api.invoke_tracked(&mut tracker, "placeVisits", &["1", "132"])
                .await
                .unwrap_err(),
            ApiError::UsageLimitDependent {
                source_id: "gameData".into(),
                limit: 1,
                dependent_id: "placeVisits".into()
            }
        );

        // unlimited sources are unaffected
        let (api_free, _) = api_with(Config::default(), MockTransport::new().with_json(GAME_URL, &game()));
        for _ in 0..3 {
            api_free
                .invoke_tracked(&mut tracker, "placeVisits", &["1", "132"])
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_legacy_functions() {
        let (api, _) = api(MockTransport::new().with_json(GAME_URL, &game()));
        let functions = api.legacy_functions();

        assert!(functions.contains_key("roblox_PlaceVisits"));
        assert!(!functions.contains_key("roblox_UserId"));

        let visits = &functions["roblox_PlaceVisits"];
        assert_eq!(visits.source().id(), "placeVisits");
        assert_eq!(visits.call(&["1", "132"]).await.unwrap().to_string(), "9000");

        // legacy output ignores formatting arguments
        let game = &functions["roblox_GameData"];
        let output = game.call(&["1", "132", "pretty=true"]).await.unwrap();
        assert!(output.is_json());
        assert!(!output.to_string().contains('\n'));
    }

    #[tokio::test]
    async fn test_legacy_functions_disabled() {
        let mut config = Config::default();
        config.register_legacy_aliases = false;
        let (api, _) = api_with(config, MockTransport::new());
        assert!(api.legacy_functions().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_call_tracked() {
        let mut config = Config::default();
        config.usage_limits.insert("gameData".into(), 0);
        let (api, _) = api_with(config, MockTransport::new().with_json(GAME_URL, &game()));
        let mut tracker = UsageTracker::new();

        let err = api.legacy_functions()["roblox_GameData"]
            .call_tracked(&mut tracker, &["1", "132"])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::UsageLimit {
                source_id: "gameData".into(),
                limit: 0
            }
        );
    }
}
