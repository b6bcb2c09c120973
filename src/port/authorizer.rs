//! Authorization port for ledger-mutating maintenance actions.
//!
//! The crate never checks credentials itself. Callers plug in an
//! [`Authorizer`] that decides whether an action may proceed.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maintenance actions that need authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    RemoveOpportunity,
    ExportLedger,
    ImportLedger,
    ClearLedger,
    UpdateSettings,
}

impl AdminAction {
    pub const ALL: [AdminAction; 5] = [
        AdminAction::RemoveOpportunity,
        AdminAction::ExportLedger,
        AdminAction::ImportLedger,
        AdminAction::ClearLedger,
        AdminAction::UpdateSettings,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AdminAction::RemoveOpportunity => "remove_opportunity",
            AdminAction::ExportLedger => "export_ledger",
            AdminAction::ImportLedger => "import_ledger",
            AdminAction::ClearLedger => "clear_ledger",
            AdminAction::UpdateSettings => "update_settings",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s.trim())
            .ok_or_else(|| format!("unknown admin action '{s}'"))
    }
}

pub trait Authorizer: Send + Sync {
    fn authorize(&self, action: AdminAction) -> bool;
}

/// Permits a fixed set of actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionAllowList {
    allowed: BTreeSet<AdminAction>,
}

impl ActionAllowList {
    pub fn new(allowed: impl IntoIterator<Item = AdminAction>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Every action permitted.
    pub fn all() -> Self {
        Self::new(AdminAction::ALL)
    }

    /// Nothing permitted.
    pub fn none() -> Self {
        Self::new([])
    }
}

impl Authorizer for ActionAllowList {
    fn authorize(&self, action: AdminAction) -> bool {
        self.allowed.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_permits_only_listed_actions() {
        let auth = ActionAllowList::new([AdminAction::ExportLedger]);
        assert!(auth.authorize(AdminAction::ExportLedger));
        assert!(!auth.authorize(AdminAction::ClearLedger));
        assert!(!ActionAllowList::none().authorize(AdminAction::ExportLedger));
        assert!(ActionAllowList::all().authorize(AdminAction::ClearLedger));
    }

    #[test]
    fn actions_parse_from_names() {
        for action in AdminAction::ALL {
            assert_eq!(action.as_str().parse::<AdminAction>(), Ok(action));
        }
        assert!("drop_tables".parse::<AdminAction>().is_err());
    }
}
