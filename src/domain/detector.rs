//! Cross-bookmaker sure-bet detection.
//!
//! For one event, pick the best price per outcome label across bookmakers
//! and check whether the implied probabilities sum to less than 1. When they
//! do, staking every outcome in proportion to its implied probability
//! returns the same amount whatever happens, and that amount exceeds the
//! total stake.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::error::DomainError;
use super::event::SportingEvent;
use super::id::BookmakerId;
use super::odds::{Outcome, Quote};
use super::opportunity::{Opportunity, OpportunityBuildError};
use super::money::Price;

/// Which bookmakers' quotes are eligible for detection.
#[derive(Debug, Clone, Default)]
pub struct BookmakerFilter {
    /// `None` admits every bookmaker.
    allowed: Option<BTreeSet<BookmakerId>>,
    excluded: BTreeSet<BookmakerId>,
}

impl BookmakerFilter {
    /// Admit every bookmaker.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Admit only the listed bookmakers.
    pub fn allow_list<I, B>(bookmakers: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<BookmakerId>,
    {
        Self {
            allowed: Some(bookmakers.into_iter().map(Into::into).collect()),
            excluded: BTreeSet::new(),
        }
    }

    /// Additionally reject the listed bookmakers.
    pub fn excluding<I, B>(mut self, bookmakers: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<BookmakerId>,
    {
        self.excluded.extend(bookmakers.into_iter().map(Into::into));
        self
    }

    pub fn allows(&self, bookmaker: &BookmakerId) -> bool {
        if self.excluded.contains(bookmaker) {
            return false;
        }
        self.allowed
            .as_ref()
            .map_or(true, |allowed| allowed.contains(bookmaker))
    }
}

/// Turns one event's multi-bookmaker quotes into at most one opportunity.
#[derive(Debug, Clone, Default)]
pub struct ArbitrageDetector {
    filter: BookmakerFilter,
}

impl ArbitrageDetector {
    pub fn new(filter: BookmakerFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &BookmakerFilter {
        &self.filter
    }

    /// Detect a sure bet on one event.
    ///
    /// Returns `None` when the event has no guaranteed-profit combination,
    /// which is the common case and not an error.
    pub fn detect(&self, event: &SportingEvent, now: DateTime<Utc>) -> Option<Opportunity> {
        // Bookmakers quoting a single outcome cannot contribute a full market.
        let books: BTreeMap<&BookmakerId, &[Quote]> = event
            .books()
            .iter()
            .filter(|(bookmaker, quotes)| self.filter.allows(bookmaker) && quotes.len() >= 2)
            .map(|(bookmaker, quotes)| (bookmaker, quotes.as_slice()))
            .collect();

        if books.len() < 2 {
            trace!(event_id = event.id(), books = books.len(), "Too few bookmakers");
            return None;
        }

        let picks = best_prices(&books, event.id())?;
        if picks.len() < 2 {
            trace!(event_id = event.id(), "Too few priced outcomes");
            return None;
        }

        let result = Opportunity::builder()
            .id(event.id())
            .sport(event.sport())
            .event_name(event.name())
            .commence_time(event.commence_time())
            .outcomes(picks)
            .discovered_at(now)
            .build();

        match result {
            Ok(opportunity) => {
                debug!(
                    event_id = event.id(),
                    event = event.name(),
                    profit_pct = %opportunity.profit_percentage().round_dp(4),
                    "Sure bet detected"
                );
                Some(opportunity)
            }
            Err(OpportunityBuildError::Invalid(DomainError::NoEdge { inverse_sum })) => {
                trace!(event_id = event.id(), inverse_sum = %inverse_sum, "No arbitrage");
                None
            }
            Err(err) => {
                debug!(event_id = event.id(), error = %err, "Event skipped");
                None
            }
        }
    }

    /// Run detection over a batch of events.
    pub fn detect_all<'a, I>(&self, events: I, now: DateTime<Utc>) -> Vec<Opportunity>
    where
        I: IntoIterator<Item = &'a SportingEvent>,
    {
        events
            .into_iter()
            .filter_map(|event| self.detect(event, now))
            .collect()
    }
}

/// Pick the strictly highest valid price for each label.
///
/// Labels are visited in first-seen order and bookmakers in key order, so a
/// tie goes to the bookmaker that sorts first. Returns `None` if any label
/// has no valid price, since the remaining outcomes would not cover every
/// result of the event.
fn best_prices(books: &BTreeMap<&BookmakerId, &[Quote]>, event_id: &str) -> Option<Vec<Outcome>> {
    let mut labels: Vec<&str> = Vec::new();
    for quotes in books.values() {
        for quote in quotes.iter() {
            if !labels.contains(&quote.label.as_str()) {
                labels.push(&quote.label);
            }
        }
    }

    let mut picks = Vec::with_capacity(labels.len());
    for label in labels {
        let mut best: Option<(&BookmakerId, Price)> = None;
        for (bookmaker, quotes) in books {
            let candidates = quotes
                .iter()
                .filter(|quote| quote.label == label && quote.is_valid());
            for quote in candidates {
                if best.map_or(true, |(_, price)| quote.price > price) {
                    best = Some((*bookmaker, quote.price));
                }
            }
        }

        match best {
            Some((bookmaker, price)) => picks.push(Outcome::new(bookmaker.clone(), price, label)),
            None => {
                debug!(event_id, label, "Outcome has no valid price");
                return None;
            }
        }
    }

    Some(picks)
}
