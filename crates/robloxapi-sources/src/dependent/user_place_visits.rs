//! Total visits of a user's places.

use robloxapi_core::{ApiError, Arguments, DataSource, Result, SourceResolver};
use serde_json::Value;
use std::sync::Arc;

use super::{Derivation, DependentDataSource};

/// Sum of `placeVisits` over a user's games.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPlaceVisits;

impl Derivation for UserPlaceVisits {
    fn derive(&self, value: Value, _args: &Arguments) -> Result<Value> {
        let games = match value {
            Value::Null => return Err(ApiError::NoData),
            Value::Array(games) => games,
            _ => return Err(ApiError::UnexpectedDataStructure),
        };

        games
            .iter()
            .try_fold(0u64, |total, game| {
                let visits = game
                    .get("placeVisits")
                    .and_then(Value::as_u64)
                    .ok_or(ApiError::UnexpectedDataStructure)?;
                total.checked_add(visits).ok_or(ApiError::InvalidData)
            })
            .map(Value::from)
    }
}

/// Creates the `userPlaceVisits` data source on top of `userGames`.
///
/// Accepts the same arguments as `userGames`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`] if `userGames` is not registered.
pub fn user_place_visits(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    let dependency = resolver.resolve_or_fail("userGames")?;
    let spec = dependency.argument_specification().clone();
    Ok(Arc::new(DependentDataSource::new(
        "userPlaceVisits",
        spec,
        dependency,
        UserPlaceVisits,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependent::test_support::{Fixed, Resolver};
    use serde_json::json;

    async fn run(games: Value) -> Result<Value> {
        let resolver = Resolver::with(Fixed::new("userGames", games));
        user_place_visits(&resolver)
            .unwrap()
            .exec(&Arguments::required_only(["1"]).with_optional("limit", "10"))
            .await
    }

    #[tokio::test]
    async fn test_sums_visits() {
        let games = json!([
            {"id": 1, "placeVisits": 100},
            {"id": 2, "placeVisits": 23},
            {"id": 3, "placeVisits": 0}
        ]);
        assert_eq!(run(games).await, Ok(json!(123)));
        assert_eq!(run(json!([])).await, Ok(json!(0)));
    }

    #[tokio::test]
    async fn test_bad_shapes() {
        assert_eq!(run(Value::Null).await, Err(ApiError::NoData));
        assert_eq!(run(json!({"data": []})).await, Err(ApiError::UnexpectedDataStructure));
        assert_eq!(
            run(json!([{"id": 1, "placeVisits": 5}, {"id": 2}])).await,
            Err(ApiError::UnexpectedDataStructure)
        );
    }

    #[tokio::test]
    async fn test_overflowing_total_is_invalid() {
        let games = json!([
            {"id": 1, "placeVisits": u64::MAX},
            {"id": 2, "placeVisits": 1}
        ]);
        assert_eq!(run(games).await, Err(ApiError::InvalidData));
    }

    #[tokio::test]
    async fn test_forwards_arguments_and_specification() {
        let user_games = Fixed::new("userGames", json!([]));
        let resolver = Resolver::with(user_games.clone());
        let source = user_place_visits(&resolver).unwrap();

        assert_eq!(source.argument_specification(), &user_games.spec);
        assert!(!source.registers_legacy_alias());

        let args = Arguments::required_only(["1"]).with_optional("sort_order", "Desc");
        source.exec(&args).await.unwrap();
        assert_eq!(user_games.calls(), vec![args]);
    }
}
