//! The Odds API REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client as HttpClient;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::decode_feed;
use super::settings::OddsApiConfig;
use crate::error::SourceError;
use crate::port::{OddsSource, SourceBatch, SportFeed};

/// Response header carrying the remaining monthly request quota.
pub const REMAINING_HEADER: &str = "x-requests-remaining";

/// HTTP client for The Odds API v4.
pub struct OddsApiClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    regions: String,
    markets: String,
    bookmakers: Vec<String>,
}

impl OddsApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotConfigured`] when no API key was loaded.
    pub fn from_config(config: &OddsApiConfig) -> Result<Self, SourceError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SourceError::NotConfigured("ODDS_API_KEY is not set".into()))?;

        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            regions: config.regions.clone(),
            markets: config.markets.clone(),
            bookmakers: config.bookmakers.clone(),
        })
    }

    /// `GET {base}/sports/{key}/odds/` with the configured market filters.
    pub fn odds_url(&self, feed: &SportFeed) -> Result<Url, SourceError> {
        let mut url = Url::parse(&format!("{}/sports/{}/odds/", self.base_url, feed.key))
            .map_err(|err| SourceError::NotConfigured(format!("bad api_url: {err}")))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("apiKey", &self.api_key)
                .append_pair("regions", &self.regions)
                .append_pair("markets", &self.markets)
                .append_pair("oddsFormat", "decimal");
            if !self.bookmakers.is_empty() {
                query.append_pair("bookmakers", &self.bookmakers.join(","));
            }
        }

        Ok(url)
    }

    fn sports_url(&self) -> Result<Url, SourceError> {
        let mut url = Url::parse(&format!("{}/sports/", self.base_url))
            .map_err(|err| SourceError::NotConfigured(format!("bad api_url: {err}")))?;
        url.query_pairs_mut().append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

/// Parse the remaining-requests header. The API sometimes sends it as a
/// decimal number.
pub fn parse_remaining(headers: &HeaderMap) -> Option<u64> {
    let raw = headers.get(REMAINING_HEADER)?.to_str().ok()?.trim();
    raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .map(|value| value as u64)
    })
}

#[async_trait]
impl OddsSource for OddsApiClient {
    fn name(&self) -> &str {
        "the-odds-api"
    }

    async fn fetch(&self, feed: &SportFeed) -> Result<SourceBatch, SourceError> {
        let url = self.odds_url(feed)?;
        debug!(feed = %feed.key, sport = %feed.sport, "Fetching odds");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                feed: feed.key.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                feed: feed.key.clone(),
                status: status.as_u16(),
            });
        }

        let remaining_quota = parse_remaining(response.headers());
        if let Some(remaining) = remaining_quota {
            info!(feed = %feed.key, remaining, "Odds API quota");
        }

        let body = response.text().await.map_err(|source| SourceError::Http {
            feed: feed.key.clone(),
            source,
        })?;

        let decoded = decode_feed(&body, feed.sport).map_err(|reason| SourceError::Decode {
            feed: feed.key.clone(),
            reason,
        })?;

        debug!(
            feed = %feed.key,
            events = decoded.events.len(),
            malformed = decoded.malformed,
            "Fetched odds"
        );

        Ok(SourceBatch {
            events: decoded.events,
            malformed: decoded.malformed,
            remaining_quota,
        })
    }

    async fn remaining_quota(&self) -> Result<Option<u64>, SourceError> {
        // The sports listing does not count against the quota.
        let response = self
            .http
            .get(self.sports_url()?)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                feed: "sports".into(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                feed: "sports".into(),
                status: response.status().as_u16(),
            });
        }

        Ok(parse_remaining(response.headers()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sport;
    use reqwest::header::HeaderValue;

    fn client() -> OddsApiClient {
        let config = OddsApiConfig {
            api_key: Some("secret".into()),
            bookmakers: vec!["williamhill".into(), "smarkets".into()],
            ..OddsApiConfig::default()
        };
        OddsApiClient::from_config(&config).unwrap()
    }

    #[test]
    fn requires_api_key() {
        let result = OddsApiClient::from_config(&OddsApiConfig::default());
        assert!(matches!(result, Err(SourceError::NotConfigured(_))));
    }

    #[test]
    fn odds_url_carries_filters() {
        let url = client()
            .odds_url(&SportFeed::new(Sport::Football, "soccer_epl"))
            .unwrap();

        assert_eq!(url.path(), "/v4/sports/soccer_epl/odds/");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("apiKey".into(), "secret".into())));
        assert!(query.contains(&("regions".into(), "uk".into())));
        assert!(query.contains(&("markets".into(), "h2h".into())));
        assert!(query.contains(&("oddsFormat".into(), "decimal".into())));
        assert!(query.contains(&("bookmakers".into(), "williamhill,smarkets".into())));
    }

    #[test]
    fn parses_remaining_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_remaining(&headers), None);

        headers.insert(REMAINING_HEADER, HeaderValue::from_static("487"));
        assert_eq!(parse_remaining(&headers), Some(487));

        headers.insert(REMAINING_HEADER, HeaderValue::from_static("12.0"));
        assert_eq!(parse_remaining(&headers), Some(12));

        headers.insert(REMAINING_HEADER, HeaderValue::from_static("n/a"));
        assert_eq!(parse_remaining(&headers), None);
    }
}
