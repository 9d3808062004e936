//! The `gameData` data source.

use robloxapi_core::{ArgumentSpecification, ArgumentType, Arguments};
use serde_json::Value;
use std::sync::Arc;

use crate::endpoint::{Endpoint, FetcherDataSource};
use crate::fetcher::Fetcher;

/// Looks up a universe and returns the record of its root place.
///
/// Required arguments: universe ID, place ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameDataEndpoint;

impl Endpoint for GameDataEndpoint {
    fn build_endpoint(&self, args: &Arguments) -> String {
        format!("https://games.roblox.com/v1/games?universeIds={}", args.required(0))
    }

    fn post_process(&self, mut value: Value, args: &Arguments) -> Option<Value> {
        let place_id = args.required(1).parse::<u64>().ok()?;
        let Value::Array(entries) = value.get_mut("data")?.take() else {
            return None;
        };

        entries
            .into_iter()
            .find(|entry| entry.get("rootPlaceId").and_then(Value::as_u64) == Some(place_id))
    }
}

/// Creates the `gameData` data source.
#[must_use]
pub fn game_data(fetcher: Arc<Fetcher>) -> FetcherDataSource<GameDataEndpoint> {
    let spec = ArgumentSpecification::new([ArgumentType::UniverseId, ArgumentType::PlaceId])
        .with_json_args();
    FetcherDataSource::new("gameData", spec, GameDataEndpoint, fetcher).with_legacy_alias()
}
