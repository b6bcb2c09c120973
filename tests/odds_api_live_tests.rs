#![cfg(feature = "integration-tests")]

use std::env;
use std::time::Duration;

use surebet::adapter::odds_api::{OddsApiClient, OddsApiConfig};
use surebet::domain::Sport;
use surebet::port::{OddsSource, SportFeed};
use tokio::time::timeout;

fn api_key() -> Option<String> {
    env::var("ODDS_API_KEY").ok().filter(|key| !key.is_empty())
}

#[tokio::test]
#[ignore = "requires ODDS_API_KEY and network access"]
async fn live_epl_feed_decodes() {
    let Some(key) = api_key() else {
        eprintln!("Skipping live test (set ODDS_API_KEY to enable)");
        return;
    };

    let mut config: OddsApiConfig = toml::from_str("").expect("defaults");
    config.api_key = Some(key);
    let client = OddsApiClient::from_config(&config).expect("client");

    let batch = timeout(
        Duration::from_secs(30),
        client.fetch(&SportFeed::new(Sport::Football, "soccer_epl")),
    )
    .await
    .expect("Timed out querying The Odds API")
    .expect("Failed to fetch soccer_epl");

    assert!(batch.remaining_quota.is_some());
    for event in &batch.events {
        assert_eq!(event.sport(), Sport::Football);
        assert!(!event.name().is_empty());
    }
}
