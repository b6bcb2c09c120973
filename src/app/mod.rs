//! Application orchestration.
//!
//! Wires configuration, adapters and domain services together and runs the
//! scan scheduler until shutdown.

pub mod config;
mod cycle;
mod repository;
mod scanner;
mod scheduler;
mod service;

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::adapter::odds_api::OddsApiClient;
use crate::adapter::store::{JsonFileStore, MemoryStore};
use crate::domain::{ArbitrageDetector, BookmakerFilter, MarketLedger, Sport};
use crate::error::Result;
use crate::port::{Authorizer, Clock, KeyValueStore, OddsSource, SystemClock};

pub use config::Config;
pub use cycle::{CycleOutcome, CycleReport, ScanCycle};
pub use repository::{
    LedgerRepository, LedgerSnapshot, ACTIVE_KEY, HISTORY_KEY, LAST_SYNC_KEY, SETTINGS_KEY,
};
pub use scanner::{FetchReport, Scanner};
pub use scheduler::{CycleCause, CycleEvent, Scheduler, SchedulerHandle};
pub use service::{AllocationRequest, MarketService, Summary};

use config::StorageBackend;

/// Open the configured ledger store.
#[allow(clippy::result_large_err)]
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::File => Arc::new(JsonFileStore::open(&config.storage.path)?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

/// Detector admitting the configured bookmakers.
pub fn detector_from_config(config: &Config) -> ArbitrageDetector {
    let source = &config.source;
    let filter = if source.bookmakers.is_empty() {
        BookmakerFilter::allow_all()
    } else {
        BookmakerFilter::allow_list(source.bookmakers.iter().map(String::as_str))
    };
    ArbitrageDetector::new(filter.excluding(source.exclude_bookmakers.iter().map(String::as_str)))
}

/// A ledger service over the configured store, for commands that never
/// touch the odds source.
#[allow(clippy::result_large_err)]
pub fn open_service(config: &Config) -> Result<MarketService> {
    let repo = LedgerRepository::new(open_store(config)?);
    Ok(MarketService::new(
        repo,
        config.settings.to_settings(),
        Arc::new(config.admin.authorizer()),
        Arc::new(SystemClock),
        Arc::new(Mutex::new(())),
    ))
}

/// The collaborators an [`App`] runs against.
pub struct Components {
    pub source: Arc<dyn OddsSource>,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl Components {
    /// Production collaborators built from configuration.
    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            source: Arc::new(OddsApiClient::from_config(&config.source)?),
            store: open_store(config)?,
            clock: Arc::new(SystemClock),
            authorizer: Arc::new(config.admin.authorizer()),
        })
    }
}

/// A fully wired scanner plus its ledger service.
pub struct App {
    cycle: Arc<ScanCycle>,
    service: MarketService,
    interval: Duration,
    run_on_start: bool,
    bootstrap_when_empty: bool,
}

impl App {
    /// Wire an app. `sports` limits the feeds queried; empty means all.
    pub fn assemble(config: &Config, components: Components, sports: &[Sport]) -> Self {
        let defaults = config.settings.to_settings();
        let write_lock = Arc::new(Mutex::new(()));
        let repo = LedgerRepository::new(components.store);

        let scanner = Scanner::new(
            components.source,
            detector_from_config(config),
            config.source.feeds_for(sports),
            Duration::from_millis(config.source.timeout_ms),
        );

        let cycle = ScanCycle::new(
            scanner,
            MarketLedger::new(config.storage.history_policy()),
            repo.clone(),
            Arc::clone(&components.clock),
            defaults.clone(),
            Arc::clone(&write_lock),
        );

        let service = MarketService::new(
            repo,
            defaults,
            components.authorizer,
            components.clock,
            write_lock,
        );

        Self {
            cycle: Arc::new(cycle),
            service,
            interval: config.schedule.interval(),
            run_on_start: config.schedule.run_on_start,
            bootstrap_when_empty: config.schedule.bootstrap_when_empty,
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &Config, sports: &[Sport]) -> Result<Self> {
        Ok(Self::assemble(config, Components::from_config(config)?, sports))
    }

    pub fn cycle(&self) -> &Arc<ScanCycle> {
        &self.cycle
    }

    pub fn service(&self) -> &MarketService {
        &self.service
    }

    /// Scheduler for this app. Runs at start-up when configured to, or
    /// when the active set is empty and bootstrapping is on.
    #[allow(clippy::result_large_err)]
    pub fn scheduler(&self) -> Result<Scheduler> {
        let empty = self.cycle.repository().load_active()?.is_empty();
        let run_now = self.run_on_start || (self.bootstrap_when_empty && empty);
        if run_now && !self.run_on_start {
            info!("Active set is empty, running bootstrap scan");
        }
        Ok(Scheduler::new(Arc::clone(&self.cycle), self.interval).run_on_start(run_now))
    }

    /// Run the scheduler until Ctrl-C, handing every cycle event to
    /// `observe`.
    #[allow(clippy::result_large_err)]
    pub async fn run<F>(self, mut observe: F) -> Result<()>
    where
        F: FnMut(&CycleEvent),
    {
        let (handle, mut events) = self.scheduler()?.start();

        loop {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else { break };
                    // Failed cycles are logged by the scheduler; keep running.
                    if let Ok(CycleOutcome::SourceUnavailable { feeds_failed }) = &event.result {
                        warn!(feeds_failed, "No feed answered; last sync is stale");
                    }
                    observe(&event);
                }
            }
        }

        handle.stop().await;
        Ok(())
    }
}
