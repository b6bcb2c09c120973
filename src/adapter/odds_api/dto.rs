//! The Odds API response types.
//!
//! Responses are decoded one event at a time so that a single malformed
//! event does not invalidate the rest of the feed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::{Quote, Sport, SportingEvent};

/// Head-to-head market key.
pub const H2H: &str = "h2h";

#[derive(Debug, Clone, Deserialize)]
pub struct EventDto {
    pub id: String,
    #[serde(default)]
    pub sport_key: Option<String>,
    #[serde(default)]
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<BookmakerDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookmakerDto {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<MarketDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketDto {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<OutcomeDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeDto {
    pub name: String,
    pub price: Decimal,
}

impl EventDto {
    /// Convert into a domain event using each bookmaker's head-to-head
    /// market. Bookmakers without one are left out.
    pub fn into_event(self, sport: Sport) -> Result<SportingEvent, DomainError> {
        let name = SportingEvent::display_name(
            self.home_team.as_deref(),
            self.away_team.as_deref(),
            &self.sport_title,
        );
        let mut event = SportingEvent::try_new(self.id, sport, name, self.commence_time)?;

        for bookmaker in self.bookmakers {
            let Some(market) = bookmaker.markets.into_iter().find(|m| m.key == H2H) else {
                continue;
            };
            let quotes = market
                .outcomes
                .into_iter()
                .map(|o| Quote::new(o.name, o.price))
                .collect();
            event = event.with_book(bookmaker.key, quotes);
        }

        Ok(event)
    }
}

/// Decoded feed body.
#[derive(Debug, Default)]
pub struct DecodedFeed {
    pub events: Vec<SportingEvent>,
    pub malformed: usize,
}

/// Decode a feed body that must be a JSON array of events.
///
/// Returns `Err` only when the body itself is not an array; individual
/// events that fail to decode are counted and skipped.
pub fn decode_feed(body: &str, sport: Sport) -> Result<DecodedFeed, String> {
    let raw: Vec<Value> = serde_json::from_str(body).map_err(|err| err.to_string())?;

    let mut decoded = DecodedFeed::default();
    for value in raw {
        let event_id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();

        let result = serde_json::from_value::<EventDto>(value)
            .map_err(|err| err.to_string())
            .and_then(|dto| dto.into_event(sport).map_err(|err| err.to_string()));

        match result {
            Ok(event) => decoded.events.push(event),
            Err(reason) => {
                debug!(event_id = %event_id, reason = %reason, "Skipping malformed event");
                decoded.malformed += 1;
            }
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookmakerId;
    use rust_decimal_macros::dec;

    const BODY: &str = r#"[
        {
            "id": "e912",
            "sport_key": "soccer_epl",
            "sport_title": "EPL",
            "commence_time": "2026-05-02T14:00:00Z",
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "bookmakers": [
                {
                    "key": "williamhill",
                    "title": "William Hill",
                    "markets": [
                        {"key": "h2h", "outcomes": [
                            {"name": "Arsenal", "price": 2.1},
                            {"name": "Chelsea", "price": 3.4},
                            {"name": "Draw", "price": 3.3}
                        ]}
                    ]
                },
                {
                    "key": "smarkets",
                    "markets": [{"key": "spreads", "outcomes": []}]
                }
            ]
        },
        {"id": "broken", "commence_time": "not a date"},
        {
            "id": "e913",
            "sport_title": "EPL",
            "commence_time": "2026-05-02T16:30:00Z",
            "bookmakers": []
        }
    ]"#;

    #[test]
    fn decodes_good_events_and_counts_bad_ones() {
        let decoded = decode_feed(BODY, Sport::Football).unwrap();

        assert_eq!(decoded.malformed, 1);
        assert_eq!(decoded.events.len(), 2);

        let first = &decoded.events[0];
        assert_eq!(first.id(), "e912");
        assert_eq!(first.name(), "Arsenal vs Chelsea");
        assert_eq!(first.books().len(), 1);

        let quotes = &first.books()[&BookmakerId::new("williamhill")];
        assert_eq!(quotes[0].label, "Arsenal");
        assert!((quotes[0].price - dec!(2.1)).abs() < dec!(0.0000001));
        assert_eq!(quotes.len(), 3);
    }

    #[test]
    fn event_without_teams_uses_sport_title() {
        let decoded = decode_feed(BODY, Sport::Football).unwrap();
        assert_eq!(decoded.events[1].name(), "EPL");
    }

    #[test]
    fn non_array_body_is_an_error() {
        assert!(decode_feed(r#"{"message": "Invalid API key"}"#, Sport::Football).is_err());
    }

    #[test]
    fn event_with_empty_id_is_malformed() {
        let body = r#"[{"id": "", "sport_title": "EPL", "commence_time": "2026-05-02T14:00:00Z"}]"#;
        let decoded = decode_feed(body, Sport::Football).unwrap();
        assert_eq!(decoded.malformed, 1);
        assert!(decoded.events.is_empty());
    }
}
