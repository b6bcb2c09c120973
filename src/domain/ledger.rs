//! Active opportunity set and the per-cycle merge.
//!
//! The merge is a pure function of the previous state and the fresh batch.
//! Callers persist the resulting [`LedgerUpdate`] and only then adopt it, so
//! a failed write leaves the previous state in force.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::history::{HistoryLog, HistoryPolicy};
use super::id::OpportunityId;
use super::opportunity::Opportunity;
use super::sport::Sport;

/// Currently valid opportunities keyed by id. Never holds expired entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Opportunity>", into = "Vec<Opportunity>")]
pub struct ActiveSet {
    entries: BTreeMap<OpportunityId, Opportunity>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id. Expired snapshots are ignored.
    pub fn insert(&mut self, opportunity: Opportunity) -> Option<Opportunity> {
        if opportunity.is_expired() {
            return None;
        }
        self.entries.insert(opportunity.id().clone(), opportunity)
    }

    pub fn get(&self, id: &OpportunityId) -> Option<&Opportunity> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &OpportunityId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn remove(&mut self, id: &OpportunityId) -> Option<Opportunity> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Opportunity> {
        self.entries.values()
    }

    /// Opportunities sorted by yield, best first, optionally for one sport.
    pub fn ranked(&self, sport: Option<Sport>) -> Vec<&Opportunity> {
        let mut ranked: Vec<&Opportunity> = self
            .iter()
            .filter(|opp| sport.map_or(true, |s| opp.sport() == s))
            .collect();
        ranked.sort_by(|a, b| {
            b.profit_percentage()
                .cmp(&a.profit_percentage())
                .then_with(|| a.id().cmp(b.id()))
        });
        ranked
    }

    /// Highest yield in the set.
    pub fn max_yield(&self) -> Option<Decimal> {
        self.iter().map(Opportunity::profit_percentage).max()
    }
}

impl From<Vec<Opportunity>> for ActiveSet {
    fn from(opportunities: Vec<Opportunity>) -> Self {
        let mut set = Self::new();
        for opportunity in opportunities {
            set.insert(opportunity);
        }
        set
    }
}

impl From<ActiveSet> for Vec<Opportunity> {
    fn from(set: ActiveSet) -> Self {
        set.entries.into_values().collect()
    }
}

impl FromIterator<Opportunity> for ActiveSet {
    fn from_iter<T: IntoIterator<Item = Opportunity>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Result of one merge: the state to persist plus what changed.
#[derive(Debug, Clone)]
pub struct LedgerUpdate {
    pub active: ActiveSet,
    pub history: HistoryLog,
    /// Ids seen for the first time this cycle.
    pub detected: Vec<OpportunityId>,
    /// Ids that were already active and were quoted again.
    pub refreshed: Vec<OpportunityId>,
    /// Ids kept without a fresh quote because the event has not started.
    pub carried: Vec<OpportunityId>,
    /// Expiry snapshots written to history.
    pub expired: Vec<Opportunity>,
    /// History records added, after dedup.
    pub recorded: usize,
    /// History records removed by retention.
    pub pruned: usize,
}

/// Merges fresh detections into the active set and history.
#[derive(Debug, Clone, Default)]
pub struct MarketLedger {
    policy: HistoryPolicy,
}

impl MarketLedger {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &HistoryPolicy {
        &self.policy
    }

    /// Compute the next ledger state.
    ///
    /// A fresh opportunity replaces the active entry with the same id,
    /// carrying over when that id was first seen, and is recorded in
    /// history at its own discovery time. A previous entry missing from the
    /// batch is carried forward while its event is in the future and
    /// expired into history otherwise.
    pub fn merge(
        &self,
        fresh: Vec<Opportunity>,
        previous: &ActiveSet,
        history: &HistoryLog,
        now: DateTime<Utc>,
    ) -> LedgerUpdate {
        let mut active = ActiveSet::new();
        let mut detected = Vec::new();
        let mut refreshed = Vec::new();

        for opportunity in fresh {
            let opportunity = match previous.get(opportunity.id()) {
                Some(prev) => {
                    refreshed.push(opportunity.id().clone());
                    opportunity.refreshed_from(prev)
                }
                None => {
                    detected.push(opportunity.id().clone());
                    opportunity
                }
            };
            active.insert(opportunity);
        }
        detected.dedup();
        refreshed.dedup();

        let mut carried = Vec::new();
        let mut expired = Vec::new();
        for prev in previous.iter() {
            if active.contains(prev.id()) {
                continue;
            }
            if prev.commence_time() > now {
                carried.push(prev.id().clone());
                active.insert(prev.clone());
            } else {
                expired.push(prev.clone().into_expired());
            }
        }

        let mut history = history.clone();
        let mut recorded = history.append_all(expired.iter().cloned());
        recorded += history.append_all(active.iter().filter(|o| !carried.contains(o.id())).cloned());
        let pruned = history.prune(now, &self.policy);

        LedgerUpdate {
            active,
            history,
            detected,
            refreshed,
            carried,
            expired,
            recorded,
            pruned,
        }
    }
}
