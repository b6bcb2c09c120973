//! Stake allocation across the outcomes of a sure bet.
//!
//! Stakes are split in inverse proportion to each outcome's effective price
//! so every outcome pays back the same amount. Exchanges take commission on
//! net winnings, which lowers their effective price.

use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::error::DomainError;
use super::id::BookmakerId;
use super::money::{Percent, Price, Stake, HUNDRED};
use super::odds::Outcome;

/// How computed stakes are presented to the bettor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeRounding {
    /// Round each stake to the nearest whole currency unit.
    ///
    /// Returns are no longer exactly equal; the plan's profit is taken from
    /// the worst outcome so it stays a true lower bound.
    #[default]
    WholeUnits,
    /// Keep the exact proportional stakes.
    Exact,
}

impl StakeRounding {
    pub fn from_flag(round: bool) -> Self {
        if round {
            Self::WholeUnits
        } else {
            Self::Exact
        }
    }

    fn apply(self, stake: Stake) -> Stake {
        match self {
            Self::WholeUnits => {
                stake.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            }
            Self::Exact => stake,
        }
    }
}

/// One bet in an allocation plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeLeg {
    pub outcome: Outcome,
    pub is_exchange: bool,
    /// Price after exchange commission.
    pub effective_price: Price,
    pub stake: Stake,
    /// Amount returned (stake included) if this outcome wins.
    pub payout: Decimal,
}

/// A concrete betting plan for one opportunity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub legs: Vec<StakeLeg>,
    /// Sum of the stakes actually placed, after rounding.
    pub total_stake: Stake,
    /// Worst-case return minus total stake.
    pub guaranteed_profit: Decimal,
    pub guaranteed_profit_percent: Percent,
    pub rounding: StakeRounding,
}

impl AllocationPlan {
    /// Smallest payout across the legs.
    pub fn worst_payout(&self) -> Decimal {
        self.legs
            .iter()
            .map(|leg| leg.payout)
            .min()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_profitable(&self) -> bool {
        self.guaranteed_profit > Decimal::ZERO
    }
}

/// Computes stake splits. Holds no state beyond its configuration.
#[derive(Debug, Clone)]
pub struct StakeAllocator {
    commission: Percent,
    exchanges: BTreeSet<BookmakerId>,
}

impl StakeAllocator {
    /// Create an allocator charging `commission` percent on exchange
    /// winnings. No bookmaker is an exchange until [`with_exchanges`] is
    /// called.
    ///
    /// [`with_exchanges`]: StakeAllocator::with_exchanges
    pub fn new(commission: Percent) -> Self {
        Self {
            commission,
            exchanges: BTreeSet::new(),
        }
    }

    pub fn with_exchanges<I, B>(mut self, exchanges: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<BookmakerId>,
    {
        self.exchanges.extend(exchanges.into_iter().map(Into::into));
        self
    }

    pub fn commission(&self) -> Percent {
        self.commission
    }

    pub fn is_exchange(&self, bookmaker: &BookmakerId) -> bool {
        self.exchanges.contains(bookmaker)
    }

    /// Price after commission: `1 + (price - 1) * (1 - commission / 100)` on
    /// exchanges, the quoted price elsewhere.
    pub fn effective_price(&self, outcome: &Outcome) -> Price {
        if self.is_exchange(&outcome.bookmaker) {
            Decimal::ONE + (outcome.price - Decimal::ONE) * (Decimal::ONE - self.commission / HUNDRED)
        } else {
            outcome.price
        }
    }

    /// Split `total_stake` across `outcomes`.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive stake, fewer than two outcomes, a commission
    /// outside `[0, 100)`, a price `<= 1`, a stake too small to survive
    /// rounding on any outcome, and a stake too large for decimal
    /// arithmetic.
    pub fn allocate(
        &self,
        outcomes: &[Outcome],
        total_stake: Stake,
        rounding: StakeRounding,
    ) -> Result<AllocationPlan, DomainError> {
        if total_stake <= Decimal::ZERO {
            return Err(DomainError::NonPositiveStake { stake: total_stake });
        }
        if outcomes.len() < 2 {
            return Err(DomainError::TooFewOutcomes {
                count: outcomes.len(),
            });
        }
        if self.commission < Decimal::ZERO || self.commission >= HUNDRED {
            return Err(DomainError::InvalidCommission {
                commission: self.commission,
            });
        }
        if let Some(bad) = outcomes.iter().find(|o| o.price <= Decimal::ONE) {
            return Err(DomainError::InvalidPrice {
                bookmaker: bad.bookmaker.to_string(),
                label: bad.label.clone(),
                price: bad.price,
            });
        }

        let too_large = || DomainError::StakeTooLarge { stake: total_stake };

        let effective: Vec<Price> = outcomes.iter().map(|o| self.effective_price(o)).collect();
        let total_inverse: Decimal = effective.iter().map(|price| Decimal::ONE / price).sum();

        let legs = outcomes
            .iter()
            .zip(&effective)
            .map(|(outcome, &effective_price)| {
                let raw = effective_price
                    .checked_mul(total_inverse)
                    .and_then(|weight| total_stake.checked_div(weight))
                    .ok_or_else(too_large)?;
                let stake = rounding.apply(raw);
                let payout = stake.checked_mul(effective_price).ok_or_else(too_large)?;
                Ok(StakeLeg {
                    outcome: outcome.clone(),
                    is_exchange: self.is_exchange(&outcome.bookmaker),
                    effective_price,
                    stake,
                    payout,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let actual_total = legs
            .iter()
            .try_fold(Decimal::ZERO, |sum, leg| sum.checked_add(leg.stake))
            .ok_or_else(too_large)?;
        if actual_total <= Decimal::ZERO {
            return Err(DomainError::StakeRoundsToZero { stake: total_stake });
        }

        let worst = legs
            .iter()
            .map(|leg| leg.payout)
            .min()
            .unwrap_or(Decimal::ZERO);
        let guaranteed_profit = worst.checked_sub(actual_total).ok_or_else(too_large)?;
        let guaranteed_profit_percent = guaranteed_profit
            .checked_div(actual_total)
            .and_then(|ratio| ratio.checked_mul(HUNDRED))
            .ok_or_else(too_large)?;

        Ok(AllocationPlan {
            legs,
            total_stake: actual_total,
            guaranteed_profit,
            guaranteed_profit_percent,
            rounding,
        })
    }
}
