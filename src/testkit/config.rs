//! Canonical test configuration and app wiring.

use std::sync::Arc;

use crate::adapter::odds_api::FeedConfig;
use crate::app::config::StorageBackend;
use crate::app::{App, Components, Config};
use crate::domain::Sport;
use crate::port::{ActionAllowList, Authorizer, Clock, KeyValueStore, OddsSource};

/// Feed key used by [`config`].
pub const TENNIS_FEED: &str = "tennis_atp";

/// Second feed key used by [`config`].
pub const FOOTBALL_FEED: &str = "soccer_epl";

/// In-memory configuration with one tennis and one football feed and no
/// bookmaker filtering.
pub fn config() -> Config {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    config.source.bookmakers.clear();
    config.source.feeds = vec![
        FeedConfig {
            sport: Sport::Tennis,
            keys: vec![TENNIS_FEED.to_string()],
        },
        FeedConfig {
            sport: Sport::Football,
            keys: vec![FOOTBALL_FEED.to_string()],
        },
    ];
    config
}

/// Wire an [`App`] with every admin action allowed.
pub fn app(
    config: &Config,
    source: Arc<dyn OddsSource>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
) -> App {
    app_with_authorizer(config, source, store, clock, Arc::new(ActionAllowList::all()))
}

pub fn app_with_authorizer(
    config: &Config,
    source: Arc<dyn OddsSource>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    authorizer: Arc<dyn Authorizer>,
) -> App {
    let components = Components {
        source,
        store,
        clock,
        authorizer,
    };
    App::assemble(config, components, &[])
}
