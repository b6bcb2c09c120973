//! Ledger storage configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{HistoryPolicy, DEFAULT_RETENTION_DAYS};

/// Where the ledger is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    /// Nothing survives the process; for dry runs.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_path")]
    pub path: PathBuf,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_path() -> PathBuf {
    PathBuf::from("data/ledger.json")
}

const fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

impl StorageConfig {
    pub fn history_policy(&self) -> HistoryPolicy {
        HistoryPolicy::with_retention_days(self.retention_days)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            retention_days: default_retention_days(),
        }
    }
}
