//! Thumbnail image URLs on the Roblox CDN.

use robloxapi_core::{
    ApiError, ArgumentType, Arguments, DataSource, Result, SourceResolver, is_roblox_cdn_url,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{Derivation, DependentDataSource};
use crate::thumbnail::{DEFAULT_FORMAT, ThumbnailEndpoint};

/// Image URL of the first thumbnail, verified to point at the Roblox CDN.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailUrl;

impl Derivation for ThumbnailUrl {
    fn derive(&self, value: Value, args: &Arguments) -> Result<Value> {
        let thumbnails = match value {
            Value::Null => return Err(ApiError::NoData),
            Value::Array(thumbnails) => thumbnails,
            _ => return Err(ApiError::UnexpectedDataStructure),
        };

        let image_url = thumbnails
            .first()
            .and_then(|t| t.get("imageUrl"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or(ApiError::InvalidData)?;

        let format = args.optional_or("format", DEFAULT_FORMAT).to_lowercase();
        let url = format!("{image_url}.{format}");

        if !is_roblox_cdn_url(&url) {
            debug!(%url, "Thumbnail URL is not on the Roblox CDN");
            return Err(ApiError::InvalidData);
        }

        Ok(Value::String(url))
    }
}

fn thumbnail_url_source(
    resolver: &dyn SourceResolver,
    id: &str,
    dependency_id: &str,
    endpoint: ThumbnailEndpoint,
    id_type: ArgumentType,
) -> Result<DependentDataSource<ThumbnailUrl>> {
    let dependency = resolver.resolve_or_fail(dependency_id)?;
    let spec = endpoint.argument_specification(id_type);
    Ok(DependentDataSource::new(id, spec, dependency, ThumbnailUrl))
}

/// Creates the `userAvatarThumbnailUrl` data source on top of `userAvatarThumbnail`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`] if the dependency is not registered.
pub fn user_avatar_thumbnail_url(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    let source = thumbnail_url_source(
        resolver,
        "userAvatarThumbnailUrl",
        "userAvatarThumbnail",
        ThumbnailEndpoint::USER_AVATAR,
        ArgumentType::UserId,
    )?;
    Ok(Arc::new(source.with_legacy_alias()))
}

/// Creates the `assetThumbnailUrl` data source on top of `assetThumbnail`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`] if the dependency is not registered.
pub fn asset_thumbnail_url(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    let source = thumbnail_url_source(
        resolver,
        "assetThumbnailUrl",
        "assetThumbnail",
        ThumbnailEndpoint::ASSET,
        ArgumentType::AssetId,
    )?;
    Ok(Arc::new(source))
}

/// Creates the `gameIconUrl` data source on top of `gameIcon`.
///
/// # Errors
/// Returns [`ApiError::DataSourceNotFound`] if the dependency is not registered.
pub fn game_icon_url(resolver: &dyn SourceResolver) -> Result<Arc<dyn DataSource>> {
    let source = thumbnail_url_source(
        resolver,
        "gameIconUrl",
        "gameIcon",
        ThumbnailEndpoint::GAME_ICON,
        ArgumentType::PlaceId,
    )?;
    Ok(Arc::new(source))
}
