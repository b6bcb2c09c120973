//! Bookmaker-agnostic domain logic: detection, stake allocation and the
//! opportunity ledger.

mod allocation;
mod detector;
mod event;
mod history;
mod id;
mod ledger;
mod money;
mod odds;
mod opportunity;
mod settings;
mod sport;

pub mod error;

// Core domain types
pub use event::SportingEvent;
pub use id::{BookmakerId, OpportunityId};
pub use money::{Percent, Price, Stake};
pub use odds::{Fractional, OddsFormat, Outcome, Quote};
pub use opportunity::{profit_from_outcomes, Opportunity, OpportunityBuildError, OpportunityBuilder};
pub use sport::Sport;

// Detection and allocation
pub use allocation::{AllocationPlan, StakeAllocator, StakeLeg, StakeRounding};
pub use detector::{ArbitrageDetector, BookmakerFilter};

// Ledger
pub use history::{HistoryBucket, HistoryLog, HistoryPolicy, MonthKey, DEFAULT_RETENTION_DAYS};
pub use ledger::{ActiveSet, LedgerUpdate, MarketLedger};
pub use settings::{Settings, DEFAULT_EXCHANGES};
