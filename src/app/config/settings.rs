//! Default operator settings and admin permissions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::{BookmakerId, Percent, Settings, DEFAULT_EXCHANGES};
use crate::port::{ActionAllowList, AdminAction};

/// Settings used until an operator stores their own.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default = "default_commission_percent")]
    pub commission_percent: Percent,
    #[serde(default = "default_alert_threshold_percent")]
    pub alert_threshold_percent: Percent,
    #[serde(default = "default_exchanges")]
    pub exchanges: Vec<String>,
}

const fn default_is_active() -> bool {
    true
}

fn default_commission_percent() -> Decimal {
    dec!(2.0)
}

fn default_alert_threshold_percent() -> Decimal {
    dec!(3.5)
}

fn default_exchanges() -> Vec<String> {
    DEFAULT_EXCHANGES.iter().map(|s| (*s).to_string()).collect()
}

impl SettingsConfig {
    pub fn to_settings(&self) -> Settings {
        Settings {
            is_active: self.is_active,
            commission_percent: self.commission_percent,
            alert_threshold_percent: self.alert_threshold_percent,
            exchange_bookmakers: self.exchanges.iter().map(BookmakerId::new).collect(),
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            is_active: default_is_active(),
            commission_percent: default_commission_percent(),
            alert_threshold_percent: default_alert_threshold_percent(),
            exchanges: default_exchanges(),
        }
    }
}

/// Which maintenance actions this installation permits.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_allowed_actions")]
    pub allowed_actions: Vec<AdminAction>,
}

fn default_allowed_actions() -> Vec<AdminAction> {
    AdminAction::ALL.to_vec()
}

impl AdminConfig {
    pub fn authorizer(&self) -> ActionAllowList {
        ActionAllowList::new(self.allowed_actions.iter().copied())
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            allowed_actions: default_allowed_actions(),
        }
    }
}
