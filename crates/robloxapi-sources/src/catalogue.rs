//! The set of built-in data sources.

use robloxapi_core::DataSource;
use std::sync::Arc;

use crate::fetcher::Fetcher;
use crate::{game, simple, thumbnail, user_id};

pub use crate::dependent::{DEPENDENT_SOURCES, DependentFactory};

/// Creates every data source that talks to an endpoint directly, in
/// registration order.
#[must_use]
pub fn independent_sources(fetcher: &Arc<Fetcher>) -> Vec<Arc<dyn DataSource>> {
    let mut sources: Vec<Arc<dyn DataSource>> = vec![
        Arc::new(game::game_data(Arc::clone(fetcher))),
        Arc::new(user_id::user_id(Arc::clone(fetcher))),
        Arc::new(thumbnail::user_avatar_thumbnail(Arc::clone(fetcher))),
        Arc::new(thumbnail::asset_thumbnail(Arc::clone(fetcher))),
        Arc::new(thumbnail::game_icon(Arc::clone(fetcher))),
    ];

    sources.extend(
        simple::simple_sources(fetcher)
            .into_iter()
            .map(|source| Arc::new(source) as Arc<dyn DataSource>),
    );

    sources
}

/// IDs of every built-in data source.
#[must_use]
pub fn all_source_ids() -> Vec<&'static str> {
    let mut ids = vec![
        "gameData",
        "userId",
        "userAvatarThumbnail",
        "assetThumbnail",
        "gameIcon",
        "groupRoles",
        "groupData",
        "groupRolesList",
        "badgeInfo",
        "userInfo",
        "assetDetails",
        "gameNameDescription",
        "universeInfo",
        "userGames",
    ];
    ids.extend(DEPENDENT_SOURCES.iter().map(|(id, _)| *id));
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use robloxapi_cache::NoopCache;
    use robloxapi_core::Config;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_complete() {
        let fetcher = Arc::new(Fetcher::new(
            Arc::new(MockTransport::new()),
            Arc::new(NoopCache::new()),
            Arc::new(Config::default()),
        ));

        let independent: Vec<_> = independent_sources(&fetcher)
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        let all = all_source_ids();

        assert_eq!(all.len(), 22);
        assert_eq!(all.iter().collect::<HashSet<_>>().len(), all.len());
        assert_eq!(independent, all[..independent.len()]);
    }
}
