//! Odds fan-out and detection for one cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{ArbitrageDetector, Opportunity, SportingEvent};
use crate::error::SourceError;
use crate::port::{OddsSource, SourceBatch, SportFeed};

/// What the fan-out gathered.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub events: Vec<SportingEvent>,
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    pub malformed: usize,
    /// Lowest quota reported during the fan-out.
    pub remaining_quota: Option<u64>,
}

impl FetchReport {
    /// True when feeds were queried and none of them answered.
    pub fn source_unavailable(&self) -> bool {
        self.feeds_ok == 0 && self.feeds_failed > 0
    }
}

/// Queries every feed concurrently and runs detection on the results.
pub struct Scanner {
    source: Arc<dyn OddsSource>,
    detector: ArbitrageDetector,
    feeds: Vec<SportFeed>,
    fetch_timeout: Duration,
}

impl Scanner {
    pub fn new(
        source: Arc<dyn OddsSource>,
        detector: ArbitrageDetector,
        feeds: Vec<SportFeed>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            detector,
            feeds,
            fetch_timeout,
        }
    }

    pub fn feeds(&self) -> &[SportFeed] {
        &self.feeds
    }

    pub fn source(&self) -> &Arc<dyn OddsSource> {
        &self.source
    }

    async fn fetch_one(&self, feed: &SportFeed) -> Result<SourceBatch, SourceError> {
        match timeout(self.fetch_timeout, self.source.fetch(feed)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                feed: feed.key.clone(),
                after_ms: u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Fetch every feed concurrently and wait for all of them.
    ///
    /// Failed or timed-out feeds are logged and skipped.
    pub async fn fetch_all(&self) -> FetchReport {
        let results = join_all(self.feeds.iter().map(|feed| self.fetch_one(feed))).await;

        let mut report = FetchReport::default();
        for (feed, result) in self.feeds.iter().zip(results) {
            match result {
                Ok(batch) => {
                    report.feeds_ok += 1;
                    report.malformed += batch.malformed;
                    if let Some(quota) = batch.remaining_quota {
                        report.remaining_quota =
                            Some(report.remaining_quota.map_or(quota, |q| q.min(quota)));
                    }
                    debug!(feed = %feed.key, events = batch.events.len(), "Feed fetched");
                    report.events.extend(batch.events);
                }
                Err(err) => {
                    report.feeds_failed += 1;
                    warn!(feed = %feed.key, source = self.source.name(), error = %err, "Feed skipped");
                }
            }
        }
        report
    }

    pub fn detect(&self, events: &[SportingEvent], now: DateTime<Utc>) -> Vec<Opportunity> {
        self.detector.detect_all(events, now)
    }
}
