//! One scan cycle: fetch, detect, merge, persist.
//!
//! Cycles never overlap. A cycle started while another is running returns
//! [`CycleOutcome::Suppressed`] without touching the source or the ledger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::repository::LedgerRepository;
use super::scanner::Scanner;
use crate::domain::{MarketLedger, Opportunity, Settings};
use crate::error::Result;
use crate::port::Clock;

/// Counts and highlights from a completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub synced_at: DateTime<Utc>,
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    pub events: usize,
    pub malformed: usize,
    pub detected: usize,
    pub refreshed: usize,
    pub carried: usize,
    pub expired: usize,
    pub pruned: usize,
    pub active: usize,
    pub history: usize,
    /// Active opportunities above the alert threshold.
    pub hot: Vec<Opportunity>,
    pub remaining_quota: Option<u64>,
}

/// How a cycle ended when it did not fail.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// Another cycle was already running.
    Suppressed,
    /// Scanning is switched off in the settings.
    Inactive,
    /// Every feed failed; the ledger and last sync time were left alone.
    SourceUnavailable { feeds_failed: usize },
}

impl CycleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Owns everything a cycle needs.
pub struct ScanCycle {
    scanner: Scanner,
    ledger: MarketLedger,
    repo: LedgerRepository,
    clock: Arc<dyn Clock>,
    defaults: Settings,
    /// Serializes every read-modify-write of the ledger.
    write_lock: Arc<Mutex<()>>,
    in_flight: Mutex<()>,
}

impl ScanCycle {
    pub fn new(
        scanner: Scanner,
        ledger: MarketLedger,
        repo: LedgerRepository,
        clock: Arc<dyn Clock>,
        defaults: Settings,
        write_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            scanner,
            ledger,
            repo,
            clock,
            defaults,
            write_lock,
            in_flight: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &LedgerRepository {
        &self.repo
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Run a cycle unless one is already in progress.
    ///
    /// # Errors
    ///
    /// Persistence failures are returned. The previously stored ledger is
    /// left as it was.
    pub async fn run(&self) -> Result<CycleOutcome> {
        let Ok(_running) = self.in_flight.try_lock() else {
            info!("Scan already in progress, trigger suppressed");
            return Ok(CycleOutcome::Suppressed);
        };

        let settings = self.repo.load_settings(&self.defaults)?;
        if !settings.is_active {
            info!("Scanner inactive, skipping cycle");
            return Ok(CycleOutcome::Inactive);
        }

        let fetch = self.scanner.fetch_all().await;
        if fetch.source_unavailable() {
            warn!(
                feeds_failed = fetch.feeds_failed,
                "Odds source unavailable, keeping previous ledger"
            );
            return Ok(CycleOutcome::SourceUnavailable {
                feeds_failed: fetch.feeds_failed,
            });
        }

        let now = self.clock.now();
        let fresh = self.scanner.detect(&fetch.events, now);

        let _guard = self.write_lock.lock().await;
        let _store_lock = self.repo.lock()?;
        let previous = self.repo.load_active()?;
        let history = self.repo.load_history()?;

        let update = self.ledger.merge(fresh, &previous, &history, now);

        // Nothing is adopted unless the whole write succeeds.
        self.repo.commit(&update.active, &update.history, Some(now))?;

        let hot: Vec<&Opportunity> = update
            .active
            .iter()
            .filter(|opp| opp.is_hot(settings.alert_threshold_percent))
            .collect();
        for opp in &hot {
            info!(
                id = %opp.id(),
                event = opp.event_name(),
                sport = %opp.sport(),
                profit_pct = %opp.profit_percentage().round_dp(2),
                hot = true,
                "Hot opportunity"
            );
        }

        let report = CycleReport {
            synced_at: now,
            feeds_ok: fetch.feeds_ok,
            feeds_failed: fetch.feeds_failed,
            events: fetch.events.len(),
            malformed: fetch.malformed,
            detected: update.detected.len(),
            refreshed: update.refreshed.len(),
            carried: update.carried.len(),
            expired: update.expired.len(),
            pruned: update.pruned,
            active: update.active.len(),
            history: update.history.len(),
            hot: hot.into_iter().cloned().collect(),
            remaining_quota: fetch.remaining_quota,
        };

        info!(
            feeds_ok = report.feeds_ok,
            feeds_failed = report.feeds_failed,
            events = report.events,
            detected = report.detected,
            refreshed = report.refreshed,
            expired = report.expired,
            active = report.active,
            hot = report.hot.len(),
            "Scan cycle complete"
        );

        Ok(CycleOutcome::Completed(report))
    }
}
