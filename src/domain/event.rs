//! Sporting events as quoted by the odds feed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::id::BookmakerId;
use super::odds::Quote;
use super::sport::Sport;

/// A validated event with every bookmaker's quotes for its outcomes.
///
/// Bookmakers are kept in a key-ordered map so that detection visits them in
/// a fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct SportingEvent {
    id: String,
    sport: Sport,
    name: String,
    commence_time: DateTime<Utc>,
    books: BTreeMap<BookmakerId, Vec<Quote>>,
}

impl SportingEvent {
    /// Build an event, validating the identifying fields.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedEvent`] when the id or name is blank.
    pub fn try_new(
        id: impl Into<String>,
        sport: Sport,
        name: impl Into<String>,
        commence_time: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(DomainError::MalformedEvent {
                event_id: id,
                reason: "event id is empty".into(),
            });
        }
        if name.trim().is_empty() {
            return Err(DomainError::MalformedEvent {
                event_id: id,
                reason: "event has no name".into(),
            });
        }

        Ok(Self {
            id,
            sport,
            name,
            commence_time,
            books: BTreeMap::new(),
        })
    }

    /// Event display name: `"{home} vs {away}"` when both teams are known,
    /// otherwise the feed's sport title.
    pub fn display_name(home: Option<&str>, away: Option<&str>, fallback: &str) -> String {
        match (home, away) {
            (Some(home), Some(away)) if !home.is_empty() && !away.is_empty() => {
                format!("{home} vs {away}")
            }
            _ => fallback.to_string(),
        }
    }

    /// Add (or replace) one bookmaker's quotes.
    pub fn with_book(mut self, bookmaker: impl Into<BookmakerId>, quotes: Vec<Quote>) -> Self {
        self.books.insert(bookmaker.into(), quotes);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commence_time(&self) -> DateTime<Utc> {
        self.commence_time
    }

    pub fn books(&self) -> &BTreeMap<BookmakerId, Vec<Quote>> {
        &self.books
    }
}
