//! The Odds API configuration.

use serde::Deserialize;

use crate::domain::Sport;
use crate::port::SportFeed;

/// Feed keys queried for one sport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    pub sport: Sport,
    pub keys: Vec<String>,
}

/// The Odds API (v4) source configuration.
///
/// The API key is never read from the config file; it comes from the
/// `ODDS_API_KEY` environment variable.
#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_regions")]
    pub regions: String,
    #[serde(default = "default_markets")]
    pub markets: String,
    /// Per-request timeout in milliseconds. A timed-out feed is skipped.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Bookmakers requested from the API and admitted by detection.
    #[serde(default = "default_bookmakers")]
    pub bookmakers: Vec<String>,
    /// Bookmakers dropped from detection even though they are requested.
    #[serde(default)]
    pub exclude_bookmakers: Vec<String>,
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,
    /// Loaded from `ODDS_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_api_url() -> String {
    "https://api.the-odds-api.com/v4".into()
}

fn default_regions() -> String {
    "uk".into()
}

fn default_markets() -> String {
    "h2h".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_bookmakers() -> Vec<String> {
    [
        "williamhill",
        "paddypower",
        "skybet",
        "ladbrokes_uk",
        "betfair_ex_uk",
        "smarkets",
        "matchbook",
        "unibet_uk",
        "sport888",
        "coral",
        "betfred_uk",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_feeds() -> Vec<FeedConfig> {
    let feed = |sport: Sport, keys: &[&str]| FeedConfig {
        sport,
        keys: keys.iter().map(|k| (*k).to_string()).collect(),
    };

    vec![
        feed(
            Sport::Football,
            &["soccer_epl", "soccer_efl_champ", "soccer_uefa_champs_league"],
        ),
        feed(Sport::Tennis, &["tennis_atp_wimbledon", "tennis_wta_wimbledon"]),
        feed(Sport::Basketball, &["basketball_nba", "basketball_euroleague"]),
        feed(Sport::Cricket, &["cricket_test_match", "cricket_odi"]),
        feed(Sport::Rugby, &["rugbyunion_six_nations", "rugbyleague_nrl"]),
        feed(Sport::Golf, &["golf_the_open_championship_winner"]),
        feed(Sport::Boxing, &["boxing_boxing"]),
        feed(Sport::Esports, &["esports_lol"]),
    ]
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            regions: default_regions(),
            markets: default_markets(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            bookmakers: default_bookmakers(),
            exclude_bookmakers: Vec::new(),
            feeds: default_feeds(),
            api_key: None,
        }
    }
}

impl OddsApiConfig {
    /// Every configured feed, optionally restricted to some sports.
    pub fn feeds_for(&self, sports: &[Sport]) -> Vec<SportFeed> {
        self.feeds
            .iter()
            .filter(|feed| sports.is_empty() || sports.contains(&feed.sport))
            .flat_map(|feed| {
                feed.keys
                    .iter()
                    .map(move |key| SportFeed::new(feed.sport, key.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feeds_expand_per_key() {
        let config = OddsApiConfig::default();
        let football = config.feeds_for(&[Sport::Football]);
        assert_eq!(football.len(), 3);
        assert!(football.iter().all(|f| f.sport == Sport::Football));
        assert_eq!(football[0].key, "soccer_epl");

        assert!(config.feeds_for(&[]).len() > football.len());
        assert!(config.feeds_for(&[Sport::Darts]).is_empty());
    }

    #[test]
    fn feeds_parse_from_toml() {
        let config: OddsApiConfig = toml::from_str(
            r#"
            [[feeds]]
            sport = "horse_racing"
            keys = ["horse_racing_uk"]
            "#,
        )
        .unwrap();

        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.feeds[0].sport, Sport::HorseRacing);
        assert_eq!(config.regions, "uk");
        assert!(config.api_key.is_none());
    }
}
