//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable overrides
//! for sensitive values like `ODDS_API_KEY`.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

mod logging;
mod schedule;
mod settings;
mod storage;

pub use crate::adapter::odds_api::{FeedConfig, OddsApiConfig};
pub use logging::LoggingConfig;
pub use schedule::ScheduleConfig;
pub use settings::{AdminConfig, SettingsConfig};
pub use storage::{StorageBackend, StorageConfig};

/// Environment variable holding the odds provider key.
pub const API_KEY_ENV: &str = "ODDS_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub source: OddsApiConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config = Self::parse(&content)?;

        // API key from the environment only, never from the config file
        config.source.api_key = std::env::var(API_KEY_ENV).ok();

        config.validate()?;

        Ok(config)
    }

    /// Parse TOML without touching the environment or validating.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.source.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source.api_url",
            }
            .into());
        }
        if self.source.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if let Some(feed) = self.source.feeds.iter().find(|f| f.keys.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "source.feeds",
                reason: format!("{} has no feed keys", feed.sport),
            }
            .into());
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "schedule.interval_secs",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.storage.retention_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.retention_days",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.storage.backend == StorageBackend::File
            && self.storage.path.as_os_str().is_empty()
        {
            return Err(ConfigError::MissingField {
                field: "storage.path",
            }
            .into());
        }
        let commission = self.settings.commission_percent;
        if commission < Decimal::ZERO || commission >= Decimal::ONE_HUNDRED {
            return Err(ConfigError::InvalidValue {
                field: "settings.commission_percent",
                reason: format!("{commission} is outside [0, 100)"),
            }
            .into());
        }
        if self.settings.alert_threshold_percent < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "settings.alert_threshold_percent",
                reason: "must not be negative".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sport;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.interval_secs, 1800);
        assert_eq!(config.storage.retention_days, 365);
        assert_eq!(config.settings.commission_percent, dec!(2.0));
        assert_eq!(config.logging.format, "pretty");
        assert!(config.source.feeds.iter().any(|f| f.sport == Sport::Football));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [schedule]
            interval_secs = 60
            run_on_start = true

            [storage]
            backend = "memory"
            retention_days = 30

            [settings]
            commission_percent = 5
            alert_threshold_percent = 1.5
            exchanges = ["betfair_ex_uk"]

            [admin]
            allowed_actions = ["export_ledger"]
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.schedule.run_on_start);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        let settings = config.settings.to_settings();
        assert_eq!(settings.commission_percent, dec!(5));
        assert_eq!(settings.exchange_bookmakers.len(), 1);
        assert_eq!(config.admin.allowed_actions.len(), 1);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = Config::parse("[schedule]\ninterval_secs = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "schedule.interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn commission_out_of_range_is_rejected() {
        let config = Config::parse("[settings]\ncommission_percent = 100").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_api_url_is_missing() {
        let config = Config::parse("[source]\napi_url = \"\"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                field: "source.api_url"
            })
        ));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = Config::parse("[schedule\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
