//! Opportunity type with builder pattern.
//!
//! This module provides the `Opportunity` struct representing a detected
//! sure bet, along with `OpportunityBuilder` for safe construction. The
//! builder derives the profit percentage from the outcome prices, so an
//! `Opportunity` built through it always satisfies
//! `profit_percentage > 0 <=> sum(1 / price) < 1`.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::OpportunityId;
use super::money::{Percent, HUNDRED};
use super::odds::Outcome;
use super::sport::Sport;

/// Error returned when building an Opportunity fails.
#[derive(Debug, Clone, PartialEq)]
pub enum OpportunityBuildError {
    /// Id is required but was not provided.
    MissingId,
    /// Sport is required but was not provided.
    MissingSport,
    /// Event name is required but was not provided.
    MissingEventName,
    /// Commence time is required but was not provided.
    MissingCommenceTime,
    /// Discovery time is required but was not provided.
    MissingDiscoveryTime,
    /// The outcomes violate an opportunity invariant.
    Invalid(DomainError),
}

impl fmt::Display for OpportunityBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "id is required"),
            Self::MissingSport => write!(f, "sport is required"),
            Self::MissingEventName => write!(f, "event_name is required"),
            Self::MissingCommenceTime => write!(f, "commence_time is required"),
            Self::MissingDiscoveryTime => write!(f, "discovered_at is required"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for OpportunityBuildError {}

impl From<DomainError> for OpportunityBuildError {
    fn from(err: DomainError) -> Self {
        Self::Invalid(err)
    }
}

/// A detected arbitrage opportunity.
///
/// Use `Opportunity::builder()` to construct instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    id: OpportunityId,
    sport: Sport,
    event_name: String,
    commence_time: DateTime<Utc>,
    profit_percentage: Percent,
    outcomes: Vec<Outcome>,
    /// Absent on records imported from older exports.
    #[serde(default)]
    discovered_at: Option<DateTime<Utc>>,
    /// First detection of this id, set once the opportunity is refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_seen: Option<DateTime<Utc>>,
    last_updated: DateTime<Utc>,
    #[serde(default)]
    expired: bool,
}

impl Opportunity {
    /// Create a new builder for constructing an Opportunity.
    pub fn builder() -> OpportunityBuilder {
        OpportunityBuilder::new()
    }

    pub fn id(&self) -> &OpportunityId {
        &self.id
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn commence_time(&self) -> DateTime<Utc> {
        self.commence_time
    }

    /// Guaranteed yield at detection time, `(1 / inverse_sum - 1) * 100`.
    pub fn profit_percentage(&self) -> Percent {
        self.profit_percentage
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn discovered_at(&self) -> Option<DateTime<Utc>> {
        self.discovered_at
    }

    /// When this id was first detected. Same as the discovery time until
    /// the opportunity is refreshed.
    pub fn first_seen(&self) -> Option<DateTime<Utc>> {
        self.first_seen.or(self.discovered_at)
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Timestamp used for history bucketing and retention.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.discovered_at.unwrap_or(self.last_updated)
    }

    /// Sum of implied probabilities of the chosen prices.
    pub fn inverse_sum(&self) -> Decimal {
        self.outcomes.iter().map(Outcome::implied_probability).sum()
    }

    /// Whether the yield is above the alert threshold.
    pub fn is_hot(&self, threshold: Percent) -> bool {
        self.profit_percentage > threshold
    }

    /// Whether the event has started at `now`.
    pub fn has_commenced(&self, now: DateTime<Utc>) -> bool {
        self.commence_time <= now
    }

    /// Snapshot of this opportunity flagged as expired.
    pub fn into_expired(mut self) -> Self {
        self.expired = true;
        self
    }

    /// Carry the first detection time over from the entry this one
    /// refreshes. The discovery time stays that of the new snapshot.
    pub fn refreshed_from(mut self, previous: &Opportunity) -> Self {
        self.first_seen = previous.first_seen();
        self
    }

    /// Check the invariants of a record that did not come through the
    /// builder (imports, stored data).
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        let (inverse_sum, _) = profit_from_outcomes(&self.outcomes)?;
        if self.profit_percentage <= Decimal::ZERO {
            return Err(DomainError::NoEdge { inverse_sum });
        }
        Ok(())
    }
}

/// Validate outcomes and derive `(inverse_sum, profit_percentage)`.
///
/// # Errors
///
/// Fails on fewer than two outcomes, a price `<= 1`, a repeated label, or
/// an inverse sum that is not below 1.
pub fn profit_from_outcomes(outcomes: &[Outcome]) -> Result<(Decimal, Percent), DomainError> {
    if outcomes.len() < 2 {
        return Err(DomainError::TooFewOutcomes {
            count: outcomes.len(),
        });
    }

    for (i, outcome) in outcomes.iter().enumerate() {
        if outcome.price <= Decimal::ONE {
            return Err(DomainError::InvalidPrice {
                bookmaker: outcome.bookmaker.to_string(),
                label: outcome.label.clone(),
                price: outcome.price,
            });
        }
        if outcomes[..i].iter().any(|o| o.label == outcome.label) {
            return Err(DomainError::DuplicateOutcome {
                label: outcome.label.clone(),
            });
        }
    }

    let inverse_sum: Decimal = outcomes.iter().map(Outcome::implied_probability).sum();
    if inverse_sum >= Decimal::ONE {
        return Err(DomainError::NoEdge { inverse_sum });
    }

    let profit = (Decimal::ONE / inverse_sum - Decimal::ONE) * HUNDRED;
    Ok((inverse_sum, profit))
}

/// Builder for constructing `Opportunity` instances.
///
/// # Example
///
/// ```ignore
/// let opportunity = Opportunity::builder()
///     .id("evt-1")
///     .sport(Sport::Football)
///     .event_name("Arsenal vs Chelsea")
///     .commence_time(kickoff)
///     .outcome(Outcome::new("williamhill", dec!(2.10), "Arsenal"))
///     .outcome(Outcome::new("smarkets", dec!(2.05), "Chelsea"))
///     .discovered_at(now)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct OpportunityBuilder {
    id: Option<OpportunityId>,
    sport: Option<Sport>,
    event_name: Option<String>,
    commence_time: Option<DateTime<Utc>>,
    outcomes: Vec<Outcome>,
    discovered_at: Option<DateTime<Utc>>,
}

impl OpportunityBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<OpportunityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn sport(mut self, sport: Sport) -> Self {
        self.sport = Some(sport);
        self
    }

    pub fn event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = Some(name.into());
        self
    }

    pub fn commence_time(mut self, at: DateTime<Utc>) -> Self {
        self.commence_time = Some(at);
        self
    }

    /// Append one best-price outcome.
    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcomes.push(outcome);
        self
    }

    pub fn outcomes(mut self, outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        self.outcomes.extend(outcomes);
        self
    }

    /// Set the detection time; also used as the last-updated time.
    pub fn discovered_at(mut self, at: DateTime<Utc>) -> Self {
        self.discovered_at = Some(at);
        self
    }

    /// Build the Opportunity, deriving the profit percentage.
    ///
    /// # Errors
    ///
    /// Returns `OpportunityBuildError` if a field is missing or the outcomes
    /// do not guarantee a profit.
    pub fn build(self) -> Result<Opportunity, OpportunityBuildError> {
        let id = self.id.ok_or(OpportunityBuildError::MissingId)?;
        let sport = self.sport.ok_or(OpportunityBuildError::MissingSport)?;
        let event_name = self
            .event_name
            .ok_or(OpportunityBuildError::MissingEventName)?;
        let commence_time = self
            .commence_time
            .ok_or(OpportunityBuildError::MissingCommenceTime)?;
        let discovered_at = self
            .discovered_at
            .ok_or(OpportunityBuildError::MissingDiscoveryTime)?;

        let (_, profit_percentage) = profit_from_outcomes(&self.outcomes)?;

        Ok(Opportunity {
            id,
            sport,
            event_name,
            commence_time,
            profit_percentage,
            outcomes: self.outcomes,
            discovered_at: Some(discovered_at),
            first_seen: None,
            last_updated: discovered_at,
            expired: false,
        })
    }
}
