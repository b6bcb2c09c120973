//! Scripted odds source.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::SportingEvent;
use crate::error::SourceError;
use crate::port::{OddsSource, SourceBatch, SportFeed};

/// What a feed answers once its queued results are used up.
#[derive(Debug, Clone)]
enum Standing {
    Events(Vec<SportingEvent>),
    Down,
}

#[derive(Debug, Default)]
struct FeedScript {
    queued: VecDeque<Result<SourceBatch, SourceError>>,
    standing: Option<Standing>,
}

/// An [`OddsSource`] answering from per-feed scripts.
///
/// Each fetch pops the next queued result for its feed; when the queue is
/// empty the feed's standing answer is used, and feeds without one return
/// an empty batch. Scripts can be changed while the source is shared.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    feeds: Mutex<HashMap<String, FeedScript>>,
    delay: Mutex<Option<Duration>>,
    quota: Mutex<Option<u64>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `events` for `feed` from now on.
    pub fn set_events(&self, feed: &str, events: Vec<SportingEvent>) {
        self.feeds.lock().entry(feed.to_string()).or_default().standing =
            Some(Standing::Events(events));
    }

    /// Make `feed` fail with HTTP 503 from now on.
    pub fn set_down(&self, feed: &str) {
        self.feeds.lock().entry(feed.to_string()).or_default().standing = Some(Standing::Down);
    }

    /// Answer `result` for the next fetch of `feed` only.
    pub fn push_result(&self, feed: &str, result: Result<SourceBatch, SourceError>) {
        self.feeds
            .lock()
            .entry(feed.to_string())
            .or_default()
            .queued
            .push_back(result);
    }

    /// Sleep this long inside every fetch.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    pub fn set_quota(&self, quota: Option<u64>) {
        *self.quota.lock() = quota;
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, feed: &SportFeed) -> Result<SourceBatch, SourceError> {
        let mut feeds = self.feeds.lock();
        let Some(script) = feeds.get_mut(&feed.key) else {
            return Ok(SourceBatch::default());
        };
        if let Some(result) = script.queued.pop_front() {
            return result;
        }
        match &script.standing {
            Some(Standing::Events(events)) => Ok(SourceBatch {
                events: events.clone(),
                malformed: 0,
                remaining_quota: *self.quota.lock(),
            }),
            Some(Standing::Down) => Err(SourceError::Status {
                feed: feed.key.clone(),
                status: 503,
            }),
            None => Ok(SourceBatch::default()),
        }
    }
}

#[async_trait]
impl OddsSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, feed: &SportFeed) -> Result<SourceBatch, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(feed)
    }

    async fn remaining_quota(&self) -> Result<Option<u64>, SourceError> {
        Ok(*self.quota.lock())
    }
}
