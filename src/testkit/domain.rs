//! Builders for events and opportunities used across tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{Opportunity, Outcome, Quote, Sport, SportingEvent};

/// Fixed reference time: 2026-05-01 12:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// `base_time() + hours`.
pub fn hours_later(hours: i64) -> DateTime<Utc> {
    base_time() + Duration::hours(hours)
}

/// An event with the given books, each a list of `(label, price)` quotes.
pub fn event(
    id: &str,
    sport: Sport,
    commence_time: DateTime<Utc>,
    books: Vec<(&str, Vec<(&str, Decimal)>)>,
) -> SportingEvent {
    let mut event = SportingEvent::try_new(id, sport, format!("{id} home vs {id} away"), commence_time)
        .unwrap_or_else(|err| panic!("invalid test event {id}: {err}"));
    for (bookmaker, quotes) in books {
        let quotes = quotes
            .into_iter()
            .map(|(label, price)| Quote::new(label, price))
            .collect();
        event = event.with_book(bookmaker, quotes);
    }
    event
}

/// A two-way tennis event with a sure bet: Home 2.10 at williamhill, Away
/// 2.05 at coral. Profit is about 3.735%.
pub fn sure_bet_event(id: &str, commence_time: DateTime<Utc>) -> SportingEvent {
    event(
        id,
        Sport::Tennis,
        commence_time,
        vec![
            ("williamhill", vec![("Home", dec!(2.10)), ("Away", dec!(1.80))]),
            ("coral", vec![("Home", dec!(1.75)), ("Away", dec!(2.05))]),
        ],
    )
}

/// Like [`sure_bet_event`] but with williamhill's Home price changed.
pub fn repriced_event(id: &str, commence_time: DateTime<Utc>, home: Decimal) -> SportingEvent {
    event(
        id,
        Sport::Tennis,
        commence_time,
        vec![
            ("williamhill", vec![("Home", home), ("Away", dec!(1.80))]),
            ("coral", vec![("Home", dec!(1.75)), ("Away", dec!(2.05))]),
        ],
    )
}

/// A two-way event whose best prices sum above one: no sure bet.
pub fn no_edge_event(id: &str, commence_time: DateTime<Utc>) -> SportingEvent {
    event(
        id,
        Sport::Tennis,
        commence_time,
        vec![
            ("williamhill", vec![("Home", dec!(1.90)), ("Away", dec!(1.90))]),
            ("coral", vec![("Home", dec!(1.85)), ("Away", dec!(1.95))]),
        ],
    )
}

/// An opportunity backing `prices` at distinct bookmakers `book0`, `book1`...
pub fn opportunity(
    id: &str,
    prices: &[Decimal],
    commence_time: DateTime<Utc>,
    discovered_at: DateTime<Utc>,
) -> Opportunity {
    let outcomes = prices
        .iter()
        .enumerate()
        .map(|(i, price)| Outcome::new(format!("book{i}"), *price, format!("Outcome {i}")));
    Opportunity::builder()
        .id(id)
        .sport(Sport::Tennis)
        .event_name(format!("{id} home vs {id} away"))
        .commence_time(commence_time)
        .outcomes(outcomes)
        .discovered_at(discovered_at)
        .build()
        .unwrap_or_else(|err| panic!("invalid test opportunity {id}: {err}"))
}
