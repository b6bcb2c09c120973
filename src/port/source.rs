//! Odds source port.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Sport, SportingEvent};
use crate::error::SourceError;

/// One upstream odds feed (a league or competition) belonging to a sport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SportFeed {
    pub sport: Sport,
    pub key: String,
}

impl SportFeed {
    pub fn new(sport: Sport, key: impl Into<String>) -> Self {
        Self {
            sport,
            key: key.into(),
        }
    }
}

impl fmt::Display for SportFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.sport)
    }
}

/// Events decoded from one feed.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub events: Vec<SportingEvent>,
    /// Events dropped because they failed to decode.
    pub malformed: usize,
    /// Remaining request quota reported by the provider, if any.
    pub remaining_quota: Option<u64>,
}

impl SourceBatch {
    pub fn new(events: Vec<SportingEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

/// Supplies bookmaker quotes per event.
///
/// A failed call affects only the feed it was made for; callers tolerate
/// partial results across a batch of calls.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Fetch the current events and quotes for one feed.
    async fn fetch(&self, feed: &SportFeed) -> Result<SourceBatch, SourceError>;

    /// Remaining request quota, for providers that meter usage.
    async fn remaining_quota(&self) -> Result<Option<u64>, SourceError> {
        Ok(None)
    }
}
