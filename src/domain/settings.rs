//! Operator settings read by every scan cycle.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::allocation::StakeAllocator;
use super::error::DomainError;
use super::id::BookmakerId;
use super::money::{Percent, HUNDRED};

/// Bookmakers that charge commission on winnings by default.
pub const DEFAULT_EXCHANGES: [&str; 3] = ["betfair_ex_uk", "smarkets", "matchbook"];

/// Persisted scanner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When false the scheduler skips its cycles.
    pub is_active: bool,
    /// Commission on exchange net winnings, in percent.
    pub commission_percent: Percent,
    /// Opportunities yielding more than this are flagged hot.
    pub alert_threshold_percent: Percent,
    pub exchange_bookmakers: BTreeSet<BookmakerId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_active: true,
            commission_percent: dec!(2.0),
            alert_threshold_percent: dec!(3.5),
            exchange_bookmakers: DEFAULT_EXCHANGES.into_iter().map(BookmakerId::from).collect(),
        }
    }
}

impl Settings {
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCommission`] when the commission is
    /// outside `[0, 100)`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.commission_percent < Decimal::ZERO || self.commission_percent >= HUNDRED {
            return Err(DomainError::InvalidCommission {
                commission: self.commission_percent,
            });
        }
        Ok(())
    }

    /// Allocator configured with these settings' commission and exchanges.
    pub fn allocator(&self) -> StakeAllocator {
        StakeAllocator::new(self.commission_percent)
            .with_exchanges(self.exchange_bookmakers.iter().cloned())
    }
}
