//! Deduplicated opportunity history, bucketed by month.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::id::OpportunityId;
use super::opportunity::Opportunity;

/// Default retention window in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 365;

/// How long history entries are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPolicy {
    retention: Duration,
}

impl HistoryPolicy {
    pub fn with_retention_days(days: u32) -> Self {
        Self {
            retention: Duration::days(i64::from(days)),
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Entries whose reference time is before this instant are pruned.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.retention
    }
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self::with_retention_days(DEFAULT_RETENTION_DAYS)
    }
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// All history entries recorded in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBucket {
    pub month: MonthKey,
    pub entries: Vec<Opportunity>,
}

/// Identity of a history record.
///
/// The expiry snapshot of an opportunity shares its id and discovery time
/// with the detection record, so the expired flag is part of the key.
type RecordKey = (OpportunityId, DateTime<Utc>, bool);

fn record_key(entry: &Opportunity) -> RecordKey {
    (entry.id().clone(), entry.reference_time(), entry.is_expired())
}

/// Append-only log of opportunity snapshots in insertion order.
///
/// Entries are never modified once written; they leave the log only through
/// [`HistoryLog::prune`] or [`HistoryLog::clear`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<Opportunity>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot unless a record with the same key is present.
    ///
    /// Returns whether the entry was stored.
    pub fn append(&mut self, entry: Opportunity) -> bool {
        let key = record_key(&entry);
        if self.entries.iter().any(|existing| record_key(existing) == key) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Append several snapshots, returning how many were stored.
    pub fn append_all(&mut self, entries: impl IntoIterator<Item = Opportunity>) -> usize {
        let mut seen: HashSet<RecordKey> = self.entries.iter().map(record_key).collect();
        let mut added = 0;
        for entry in entries {
            if seen.insert(record_key(&entry)) {
                self.entries.push(entry);
                added += 1;
            }
        }
        added
    }

    /// Drop entries older than the retention window, returning how many
    /// were removed.
    pub fn prune(&mut self, now: DateTime<Utc>, policy: &HistoryPolicy) -> usize {
        let cutoff = policy.cutoff(now);
        let before = self.entries.len();
        self.entries.retain(|entry| entry.reference_time() >= cutoff);
        before - self.entries.len()
    }

    /// Group entries by discovery month, newest month first.
    pub fn buckets(&self) -> Vec<HistoryBucket> {
        let mut by_month: BTreeMap<MonthKey, Vec<Opportunity>> = BTreeMap::new();
        for entry in &self.entries {
            by_month
                .entry(MonthKey::of(entry.reference_time()))
                .or_default()
                .push(entry.clone());
        }

        by_month
            .into_iter()
            .rev()
            .map(|(month, entries)| HistoryBucket { month, entries })
            .collect()
    }

    pub fn entries(&self) -> &[Opportunity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
