//! Read models and maintenance operations over the persisted ledger.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::info;

use super::repository::LedgerRepository;
use crate::domain::{
    ActiveSet, AllocationPlan, HistoryBucket, Opportunity, OpportunityId, Percent, Settings, Sport,
    Stake, StakeRounding,
};
use crate::error::{Error, Result};
use crate::port::{AdminAction, Authorizer, Clock};

/// Stake split requested by a user.
#[derive(Debug, Clone, Copy)]
pub struct AllocationRequest {
    pub stake: Stake,
    pub rounding: StakeRounding,
}

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub active: usize,
    pub hot: usize,
    pub max_yield: Option<Percent>,
    pub history: usize,
    pub last_sync: Option<DateTime<Utc>>,
    pub last_sync_age: Option<Duration>,
    pub is_active: bool,
}

/// Queries and admin actions on the ledger.
pub struct MarketService {
    repo: LedgerRepository,
    defaults: Settings,
    authorizer: Arc<dyn Authorizer>,
    clock: Arc<dyn Clock>,
    write_lock: Arc<Mutex<()>>,
}

impl MarketService {
    pub fn new(
        repo: LedgerRepository,
        defaults: Settings,
        authorizer: Arc<dyn Authorizer>,
        clock: Arc<dyn Clock>,
        write_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            repo,
            defaults,
            authorizer,
            clock,
            write_lock,
        }
    }

    fn authorize(&self, action: AdminAction) -> Result<()> {
        if self.authorizer.authorize(action) {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                action: action.to_string(),
            })
        }
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(self.repo.load_settings(&self.defaults)?)
    }

    /// Active opportunities, best yield first.
    pub fn active(&self, sport: Option<Sport>) -> Result<Vec<Opportunity>> {
        let active = self.repo.load_active()?;
        Ok(active.ranked(sport).into_iter().cloned().collect())
    }

    pub fn opportunity(&self, id: &OpportunityId) -> Result<Opportunity> {
        self.repo
            .load_active()?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// History grouped by month, newest first.
    pub fn history(&self) -> Result<Vec<HistoryBucket>> {
        Ok(self.repo.load_history()?.buckets())
    }

    pub fn summary(&self) -> Result<Summary> {
        let settings = self.settings()?;
        let snapshot = self.repo.load()?;
        let now = self.clock.now();

        Ok(Summary {
            active: snapshot.active.len(),
            hot: snapshot
                .active
                .iter()
                .filter(|opp| opp.is_hot(settings.alert_threshold_percent))
                .count(),
            max_yield: snapshot.active.max_yield(),
            history: snapshot.history.len(),
            last_sync: snapshot.last_sync,
            last_sync_age: snapshot.last_sync.map(|at| now - at),
            is_active: settings.is_active,
        })
    }

    /// Compute a betting plan for an active opportunity using the stored
    /// commission and exchange list.
    pub fn allocate(&self, id: &OpportunityId, request: AllocationRequest) -> Result<AllocationPlan> {
        let opportunity = self.opportunity(id)?;
        let settings = self.settings()?;
        let plan = settings
            .allocator()
            .allocate(opportunity.outcomes(), request.stake, request.rounding)?;
        Ok(plan)
    }

    /// Delete one active opportunity.
    pub async fn remove(&self, id: &OpportunityId) -> Result<Opportunity> {
        self.authorize(AdminAction::RemoveOpportunity)?;
        let _guard = self.write_lock.lock().await;
        let _store_lock = self.repo.lock()?;

        let mut active = self.repo.load_active()?;
        let removed = active
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.repo.save_active(&active)?;

        info!(id = %id, "Opportunity removed");
        Ok(removed)
    }

    /// The active set as pretty JSON.
    pub fn export(&self) -> Result<String> {
        self.authorize(AdminAction::ExportLedger)?;
        let active: Vec<Opportunity> = self.repo.load_active()?.into();
        Ok(serde_json::to_string_pretty(&active)?)
    }

    /// Replace the active set with an exported one.
    ///
    /// Every record is validated first; one bad record rejects the import.
    pub async fn import(&self, json: &str) -> Result<usize> {
        self.authorize(AdminAction::ImportLedger)?;

        let records: Vec<Opportunity> = serde_json::from_str(json)?;
        for record in &records {
            record.validate()?;
        }
        let active: ActiveSet = records.into_iter().filter(|r| !r.is_expired()).collect();

        let _guard = self.write_lock.lock().await;
        let _store_lock = self.repo.lock()?;
        self.repo.save_active(&active)?;

        info!(count = active.len(), "Active set imported");
        Ok(active.len())
    }

    /// Remove the active set, the history and the last sync time.
    pub async fn clear(&self) -> Result<()> {
        self.authorize(AdminAction::ClearLedger)?;
        let _guard = self.write_lock.lock().await;
        let _store_lock = self.repo.lock()?;
        self.repo.clear()?;
        info!("Ledger cleared");
        Ok(())
    }

    pub async fn update_settings(&self, settings: Settings) -> Result<()> {
        self.authorize(AdminAction::UpdateSettings)?;
        settings.validate()?;
        let _guard = self.write_lock.lock().await;
        let _store_lock = self.repo.lock()?;
        self.repo.save_settings(&settings)?;
        info!(
            is_active = settings.is_active,
            commission = %settings.commission_percent,
            threshold = %settings.alert_threshold_percent,
            "Settings updated"
        );
        Ok(())
    }
}
