//! Scan schedule configuration.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between scan cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Run a cycle as soon as the scheduler starts.
    #[serde(default)]
    pub run_on_start: bool,
    /// Run a cycle at start-up when the active set is empty, even if
    /// `run_on_start` is off.
    #[serde(default = "default_bootstrap_when_empty")]
    pub bootstrap_when_empty: bool,
}

const fn default_interval_secs() -> u64 {
    30 * 60
}

const fn default_bootstrap_when_empty() -> bool {
    true
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            run_on_start: false,
            bootstrap_when_empty: default_bootstrap_when_empty(),
        }
    }
}
