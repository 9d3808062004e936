//! Thumbnail data sources.
//!
//! All thumbnail sources share one API shape and differ in the path, the
//! name of the ID parameter and whether a return policy is sent.

use robloxapi_core::{ArgumentSpecification, ArgumentType, Arguments};
use serde_json::Value;
use std::sync::Arc;

use crate::endpoint::{Endpoint, FetcherDataSource};
use crate::fetcher::Fetcher;

/// Base URL of the thumbnail API.
pub const THUMBNAIL_API_URL: &str = "https://thumbnails.roblox.com/v1";

/// Format used when none is given.
pub const DEFAULT_FORMAT: &str = "Png";

/// Return policy used when none is given.
pub const DEFAULT_RETURN_POLICY: &str = "PlaceHolder";

/// Endpoint strategy for one kind of thumbnail.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailEndpoint {
    path: &'static str,
    id_param: &'static str,
    return_policy: bool,
}

impl ThumbnailEndpoint {
    /// Thumbnails of user avatars.
    pub const USER_AVATAR: Self = Self::new("users/avatar", "userIds");
    /// Thumbnails of assets.
    pub const ASSET: Self = Self::new("assets", "assetIds");
    /// Icons of places.
    pub const GAME_ICON: Self = Self::new("places/gameicons", "placeIds").with_return_policy();

    const fn new(path: &'static str, id_param: &'static str) -> Self {
        Self {
            path,
            id_param,
            return_policy: false,
        }
    }

    const fn with_return_policy(mut self) -> Self {
        self.return_policy = true;
        self
    }

    /// Returns the argument specification, without the JSON options.
    #[must_use]
    pub fn argument_specification(&self, id_type: ArgumentType) -> ArgumentSpecification {
        let spec = ArgumentSpecification::new([id_type, ArgumentType::ThumbnailSize])
            .with_optional("is_circular", ArgumentType::Boolean)
            .with_optional("format", ArgumentType::ThumbnailFormat);
        if self.return_policy {
            spec.with_optional("return_policy", ArgumentType::ReturnPolicy)
        } else {
            spec
        }
    }
}

impl Endpoint for ThumbnailEndpoint {
    fn build_endpoint(&self, args: &Arguments) -> String {
        let mut url = format!(
            "{THUMBNAIL_API_URL}/{}?{}={}&size={}&format={}&isCircular={}",
            self.path,
            self.id_param,
            args.required(0),
            args.required(1),
            args.optional_or("format", DEFAULT_FORMAT),
            args.optional_or("is_circular", "false"),
        );
        if self.return_policy {
            url.push_str("&returnPolicy=");
            url.push_str(args.optional_or("return_policy", DEFAULT_RETURN_POLICY));
        }
        url
    }

    fn post_process(&self, mut value: Value, _args: &Arguments) -> Option<Value> {
        value.get_mut("data").map(Value::take)
    }
}

/// A thumbnail data source.
pub type ThumbnailDataSource = FetcherDataSource<ThumbnailEndpoint>;

fn thumbnail(
    id: &str,
    endpoint: ThumbnailEndpoint,
    id_type: ArgumentType,
    fetcher: Arc<Fetcher>,
) -> ThumbnailDataSource {
    let spec = endpoint.argument_specification(id_type).with_json_args();
    FetcherDataSource::new(id, spec, endpoint, fetcher)
}

/// Creates the `userAvatarThumbnail` data source.
#[must_use]
pub fn user_avatar_thumbnail(fetcher: Arc<Fetcher>) -> ThumbnailDataSource {
    thumbnail(
        "userAvatarThumbnail",
        ThumbnailEndpoint::USER_AVATAR,
        ArgumentType::UserId,
        fetcher,
    )
    .with_legacy_alias()
}

/// Creates the `assetThumbnail` data source.
#[must_use]
pub fn asset_thumbnail(fetcher: Arc<Fetcher>) -> ThumbnailDataSource {
    thumbnail(
        "assetThumbnail",
        ThumbnailEndpoint::ASSET,
        ArgumentType::AssetId,
        fetcher,
    )
}

/// Creates the `gameIcon` data source.
#[must_use]
pub fn game_icon(fetcher: Arc<Fetcher>) -> ThumbnailDataSource {
    thumbnail(
        "gameIcon",
        ThumbnailEndpoint::GAME_ICON,
        ArgumentType::PlaceId,
        fetcher,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use robloxapi_cache::InMemoryCache;
    use robloxapi_core::{Config, DataSource};
    use serde_json::json;

    #[test]
    fn test_endpoint_defaults() {
        let args = Arguments::required_only(["1", "140x140"]);
        assert_eq!(
            ThumbnailEndpoint::USER_AVATAR.build_endpoint(&args),
            "https://thumbnails.roblox.com/v1/users/avatar?userIds=1&size=140x140&format=Png&isCircular=false"
        );
        assert_eq!(
            ThumbnailEndpoint::GAME_ICON.build_endpoint(&args),
            "https://thumbnails.roblox.com/v1/places/gameicons?placeIds=1&size=140x140&format=Png&isCircular=false&returnPolicy=PlaceHolder"
        );
    }

    #[test]
    fn test_endpoint_options() {
        let args = Arguments::required_only(["5", "420x420"])
            .with_optional("format", "Webp")
            .with_optional("is_circular", "true");
        assert_eq!(
            ThumbnailEndpoint::ASSET.build_endpoint(&args),
            "https://thumbnails.roblox.com/v1/assets?assetIds=5&size=420x420&format=Webp&isCircular=true"
        );
    }

    #[test]
    fn test_specifications() {
        let fetcher = Arc::new(Fetcher::new(
            Arc::new(MockTransport::new()),
            Arc::new(InMemoryCache::new()),
            Arc::new(Config::default()),
        ));

        let avatar = user_avatar_thumbnail(fetcher.clone());
        assert!(avatar.registers_legacy_alias());
        assert_eq!(
            avatar.argument_specification().required(),
            &[ArgumentType::UserId, ArgumentType::ThumbnailSize]
        );
        assert!(avatar.argument_specification().optional_argument("return_policy").is_none());

        let icon = game_icon(fetcher.clone());
        assert!(!icon.registers_legacy_alias());
        assert_eq!(
            icon.argument_specification().optional_argument("return_policy"),
            Some(("return_policy", ArgumentType::ReturnPolicy))
        );

        let asset = asset_thumbnail(fetcher);
        assert_eq!(asset.argument_specification().required()[0], ArgumentType::AssetId);
    }

    #[tokio::test]
    async fn test_formats_are_cached_separately() {
        let png = "https://thumbnails.roblox.com/v1/users/avatar?userIds=1&size=140x140&format=Png&isCircular=false";
        let webp = "https://thumbnails.roblox.com/v1/users/avatar?userIds=1&size=140x140&format=Webp&isCircular=false";
        let transport = Arc::new(
            MockTransport::new()
                .with_json(png, &json!({"data": [{"imageUrl": "png"}]}))
                .with_json(webp, &json!({"data": [{"imageUrl": "webp"}]})),
        );
        let source = user_avatar_thumbnail(Arc::new(Fetcher::new(
            transport.clone(),
            Arc::new(InMemoryCache::new()),
            Arc::new(Config::default()),
        )));

        let args = Arguments::required_only(["1", "140x140"]);
        let first = source.exec(&args).await.unwrap();
        let second = source
            .exec(&args.clone().with_optional("format", "Webp"))
            .await
            .unwrap();

        assert_eq!(first, json!([{"imageUrl": "png"}]));
        assert_eq!(second, json!([{"imageUrl": "webp"}]));
        assert_eq!(transport.request_count(), 2);
    }
}
