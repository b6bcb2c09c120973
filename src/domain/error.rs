//! Domain validation errors.
//!
//! Raised when an input violates a domain invariant: a malformed event from
//! the odds feed, an opportunity that cannot guarantee profit, or a stake
//! allocation request that cannot produce a plan.
//!
//! # Examples
//!
//! ```
//! use surebet::domain::error::DomainError;
//! use surebet::domain::StakeAllocator;
//! use rust_decimal_macros::dec;
//!
//! let allocator = StakeAllocator::new(dec!(2));
//! let result = allocator.allocate(&[], dec!(100), Default::default());
//!
//! assert!(matches!(result, Err(DomainError::TooFewOutcomes { count: 0 })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Allocation stake must be positive.
    #[error("stake must be positive, got {stake}")]
    NonPositiveStake {
        /// The invalid stake that was provided.
        stake: Decimal,
    },

    /// An opportunity needs at least two mutually exclusive outcomes.
    #[error("at least 2 outcomes are required, got {count}")]
    TooFewOutcomes {
        /// Number of outcomes supplied.
        count: usize,
    },

    /// Decimal odds must be strictly greater than 1.
    #[error("price for {label} at {bookmaker} must be greater than 1, got {price}")]
    InvalidPrice {
        bookmaker: String,
        label: String,
        price: Decimal,
    },

    /// Commission is a percentage of net winnings.
    #[error("commission must be within [0, 100), got {commission}")]
    InvalidCommission { commission: Decimal },

    /// Rounding to whole units left nothing to stake.
    #[error("stake {stake} rounds to zero on every outcome")]
    StakeRoundsToZero { stake: Decimal },

    /// The stake is too large to compute returns for.
    #[error("stake {stake} is too large to allocate")]
    StakeTooLarge { stake: Decimal },

    /// Outcome labels must be unique within an opportunity.
    #[error("duplicate outcome label {label}")]
    DuplicateOutcome { label: String },

    /// The odds do not lock in a profit.
    #[error("inverse odds sum {inverse_sum} is not below 1")]
    NoEdge { inverse_sum: Decimal },

    /// An event from the odds feed could not be used.
    #[error("malformed event {event_id}: {reason}")]
    MalformedEvent { event_id: String, reason: String },
}

impl DomainError {
    /// Whether this error rejects an allocation request.
    pub fn is_invalid_allocation_input(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveStake { .. }
                | Self::TooFewOutcomes { .. }
                | Self::InvalidPrice { .. }
                | Self::InvalidCommission { .. }
                | Self::StakeRoundsToZero { .. }
                | Self::StakeTooLarge { .. }
        )
    }
}
