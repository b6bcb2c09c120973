//! Handler for `check config`.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::app::config::{StorageBackend, API_KEY_ENV};
use crate::app::Config;
use crate::error::Result;

/// Validate the configuration file without scanning.
pub fn execute_config(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let key_present = config
        .source
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    let feeds = config.source.feeds_for(&[]);

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "config": config_path.display().to_string(),
            "valid": true,
            "api_key_present": key_present,
            "feeds": feeds.iter().map(|f| f.key.as_str()).collect::<Vec<_>>(),
            "interval_secs": config.schedule.interval_secs,
            "retention_days": config.storage.retention_days,
            "allowed_actions": config.admin.allowed_actions,
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", config_path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Source", &config.source.api_url);
    output::field("Regions", &config.source.regions);
    output::field("Feeds", feeds.len());
    output::field("Interval", format!("{}s", config.schedule.interval_secs));
    match config.storage.backend {
        StorageBackend::File => output::field("Storage", config.storage.path.display()),
        StorageBackend::Memory => output::field("Storage", "memory (not persisted)"),
    }
    output::field("Retention", format!("{} days", config.storage.retention_days));
    output::field("Commission", format!("{}%", config.settings.commission_percent));
    output::field("Hot above", format!("{}%", config.settings.alert_threshold_percent));

    if key_present {
        output::success("Odds API key detected");
    } else {
        output::warning(&format!(
            "{API_KEY_ENV} is not set; scanning and quota checks will fail"
        ));
    }

    output::success("Configuration check complete");
    Ok(())
}
