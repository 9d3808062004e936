//! Active players and visits of a place.

use robloxapi_core::{
    ArgumentSpecification, ArgumentType, Arguments, DataSource, Result, SourceResolver,
};
use serde_json::Value;
use std::sync::Arc;

use super::{Derivation, DependentDataSource, field};

/// Selects one numeric field of the `gameData` record.
#[derive(Debug, Clone, Copy)]
pub struct PlaceField(&'static str);

impl PlaceField {
    /// Current number of players.
    pub const PLAYING: Self = Self("playing");
    /// Total number of visits.
    pub const VISITS: Self = Self("visits");
}

impl Derivation for PlaceField {
    fn dependency_args(&self, args: &Arguments) -> Arguments {
        Arguments::required_only(args.required_values().iter().cloned())
    }

    fn derive(&self, value: Value, _args: &Arguments) -> Result<Value> {
        field(value, self.0)
    }
}

fn place_source(
    resolver: &dyn SourceResolver,
    id: &str,
    place_field: PlaceField,
) -> Result<Arc<dyn DataSource>> {
    let dependency = resolver.resolve_or_fail("gameData")?;
    let spec = ArgumentSpecification::new([ArgumentType::UniverseId, ArgumentType::PlaceId]);
    Ok(Arc::new(
        DependentDataSource::new(id, spec, dependency, place_field).with_legacy_alias(),
    ))
}

/// Creates the `placeActivePlayers` data source on top of `gameData`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`](robloxapi_core::ApiError::DataSourceNotFound)
/// if `gameData` is not registered.
pub fn place_active_players(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    place_source(resolver, "placeActivePlayers", PlaceField::PLAYING)
}

/// Creates the `placeVisits` data source on top of `gameData`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`](robloxapi_core::ApiError::DataSourceNotFound)
/// if `gameData` is not registered.
pub fn place_visits(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    place_source(resolver, "placeVisits", PlaceField::VISITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependent::test_support::{Fixed, Resolver};
    use robloxapi_core::ApiError;
    use serde_json::json;

    fn game() -> Value {
        json!({"id": 1, "rootPlaceId": 132, "playing": 17, "visits": 9_000_000})
    }

    #[tokio::test]
    async fn test_place_fields() {
        let game_data = Fixed::new("gameData", game());
        let resolver = Resolver::with(game_data.clone());
        let args = Arguments::required_only(["1", "132"]);

        let playing = place_active_players(&resolver).unwrap();
        let visits = place_visits(&resolver).unwrap();

        assert_eq!(playing.exec(&args).await.unwrap(), json!(17));
        assert_eq!(visits.exec(&args).await.unwrap(), json!(9_000_000));
        assert_eq!(game_data.calls(), vec![args.clone(), args]);
        assert!(playing.registers_legacy_alias());
        assert_eq!(visits.fetcher_source_id(), "gameData");
    }

    #[tokio::test]
    async fn test_missing_field() {
        let resolver = Resolver::with(Fixed::new("gameData", json!({"id": 1})));
        let err = place_visits(&resolver)
            .unwrap()
            .exec(&Arguments::required_only(["1", "132"]))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::UnexpectedDataStructure);
    }
}
