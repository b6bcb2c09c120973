//! Ledger persistence on top of a key-value store.
//!
//! Keys carry a schema version so a format change can live next to old data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::{ActiveSet, HistoryLog, Settings};
use crate::error::StoreError;
use crate::port::{KeyValueStore, StoreLock};

pub const ACTIVE_KEY: &str = "surebet.active.v1";
pub const HISTORY_KEY: &str = "surebet.history.v1";
pub const LAST_SYNC_KEY: &str = "surebet.last_sync.v1";
pub const SETTINGS_KEY: &str = "surebet.settings.v1";

/// Everything the ledger persists, read in one go.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub active: ActiveSet,
    pub history: HistoryLog,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Typed access to the ledger keys.
#[derive(Clone)]
pub struct LedgerRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LedgerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StoreError> {
        serde_json::to_string(value).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: err.to_string(),
        })
    }

    /// Hold the store's writer lock for a load, change and commit
    /// sequence. Other processes sharing the store wait until it drops.
    pub fn lock(&self) -> Result<StoreLock, StoreError> {
        self.store.lock()
    }

    pub fn load_active(&self) -> Result<ActiveSet, StoreError> {
        Ok(self.read(ACTIVE_KEY)?.unwrap_or_default())
    }

    pub fn load_history(&self) -> Result<HistoryLog, StoreError> {
        Ok(self.read(HISTORY_KEY)?.unwrap_or_default())
    }

    /// Time of the last cycle that reached the odds source.
    pub fn load_last_sync(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        self.read(LAST_SYNC_KEY)
    }

    pub fn load(&self) -> Result<LedgerSnapshot, StoreError> {
        Ok(LedgerSnapshot {
            active: self.load_active()?,
            history: self.load_history()?,
            last_sync: self.load_last_sync()?,
        })
    }

    /// Stored settings, or `defaults` when none were saved yet.
    pub fn load_settings(&self, defaults: &Settings) -> Result<Settings, StoreError> {
        Ok(self.read(SETTINGS_KEY)?.unwrap_or_else(|| defaults.clone()))
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.store.set(SETTINGS_KEY, Self::encode(SETTINGS_KEY, settings)?)
    }

    /// Write the active set and history together, plus the sync time when
    /// given. Either every key is written or none is.
    pub fn commit(
        &self,
        active: &ActiveSet,
        history: &HistoryLog,
        last_sync: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut writes = vec![
            (ACTIVE_KEY.to_string(), Some(Self::encode(ACTIVE_KEY, active)?)),
            (HISTORY_KEY.to_string(), Some(Self::encode(HISTORY_KEY, history)?)),
        ];
        if let Some(at) = last_sync {
            writes.push((LAST_SYNC_KEY.to_string(), Some(Self::encode(LAST_SYNC_KEY, &at)?)));
        }

        self.store.set_batch(writes)?;
        debug!(active = active.len(), history = history.len(), "Ledger committed");
        Ok(())
    }

    pub fn save_active(&self, active: &ActiveSet) -> Result<(), StoreError> {
        self.store.set(ACTIVE_KEY, Self::encode(ACTIVE_KEY, active)?)
    }

    /// Remove the active set, history and sync time. Settings stay.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.set_batch(vec![
            (ACTIVE_KEY.to_string(), None),
            (HISTORY_KEY.to_string(), None),
            (LAST_SYNC_KEY.to_string(), None),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::store::MemoryStore;
    use crate::domain::{Opportunity, Outcome, Sport};
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn opportunity() -> Opportunity {
        let now = Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap();
        Opportunity::builder()
            .id("e1")
            .sport(Sport::Football)
            .event_name("Arsenal vs Chelsea")
            .commence_time(now + Duration::hours(2))
            .outcome(Outcome::new("williamhill", dec!(2.10), "Arsenal"))
            .outcome(Outcome::new("smarkets", dec!(2.05), "Chelsea"))
            .discovered_at(now)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_store_loads_defaults() {
        let repo = LedgerRepository::new(Arc::new(MemoryStore::new()));
        let snapshot = repo.load().unwrap();
        assert!(snapshot.active.is_empty());
        assert!(snapshot.history.is_empty());
        assert!(snapshot.last_sync.is_none());
        assert_eq!(repo.load_settings(&Settings::default()).unwrap(), Settings::default());
    }

    #[test]
    fn commit_round_trips() {
        let repo = LedgerRepository::new(Arc::new(MemoryStore::new()));
        let active: ActiveSet = vec![opportunity()].into();
        let mut history = HistoryLog::new();
        history.append(opportunity());
        let at = Utc::now();

        repo.commit(&active, &history, Some(at)).unwrap();

        let snapshot = repo.load().unwrap();
        assert_eq!(snapshot.active, active);
        assert_eq!(snapshot.history, history);
        assert_eq!(snapshot.last_sync, Some(at));
    }

    #[test]
    fn corrupt_value_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store.set(ACTIVE_KEY, "{".into()).unwrap();
        let repo = LedgerRepository::new(store);

        assert!(matches!(repo.load_active(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn clear_keeps_settings() {
        let repo = LedgerRepository::new(Arc::new(MemoryStore::new()));
        let settings = Settings {
            is_active: false,
            ..Settings::default()
        };
        repo.save_settings(&settings).unwrap();
        repo.commit(&vec![opportunity()].into(), &HistoryLog::new(), Some(Utc::now()))
            .unwrap();

        repo.clear().unwrap();

        assert!(repo.load_active().unwrap().is_empty());
        assert!(repo.load_last_sync().unwrap().is_none());
        assert_eq!(repo.load_settings(&Settings::default()).unwrap(), settings);
    }
}
