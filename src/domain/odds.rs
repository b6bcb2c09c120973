//! Odds quotes and outcome picks.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::id::BookmakerId;
use super::money::{Price, HUNDRED};

/// One outcome price offered by a bookmaker, before best-price selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub label: String,
    pub price: Price,
}

impl Quote {
    pub fn new(label: impl Into<String>, price: Price) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }

    /// Decimal odds are only usable when strictly greater than 1.
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ONE
    }
}

/// One possible result of an event as priced by one bookmaker.
///
/// Inside an [`Opportunity`](super::Opportunity) each outcome is the best
/// available price for its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub bookmaker: BookmakerId,
    pub price: Price,
    pub label: String,
}

impl Outcome {
    pub fn new(bookmaker: impl Into<BookmakerId>, price: Price, label: impl Into<String>) -> Self {
        Self {
            bookmaker: bookmaker.into(),
            price,
            label: label.into(),
        }
    }

    /// Implied probability `1 / price`.
    ///
    /// Callers must have checked `price > 1`.
    pub fn implied_probability(&self) -> Decimal {
        Decimal::ONE / self.price
    }
}

/// How odds are rendered for people.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    #[default]
    Decimal,
    Fractional,
}

impl OddsFormat {
    /// Render a decimal price in this format.
    pub fn render(self, price: Price) -> String {
        match self {
            OddsFormat::Decimal => format!("{:.2}", price),
            OddsFormat::Fractional => Fractional::from_decimal(price).to_string(),
        }
    }
}

/// UK-style fractional odds, reduced to lowest terms.
///
/// Precision is limited to hundredths of the net return, so `2.10` becomes
/// `11/10` and `1.333` becomes `33/100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fractional {
    pub numerator: u64,
    pub denominator: u64,
}

impl Fractional {
    pub fn from_decimal(price: Price) -> Self {
        if price <= Decimal::ONE {
            return Self {
                numerator: 0,
                denominator: 1,
            };
        }

        let numerator = ((price - Decimal::ONE) * HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap_or(0);
        let denominator = 100;
        let common = gcd(numerator, denominator);

        Self {
            numerator: numerator / common,
            denominator: denominator / common,
        }
    }
}

impl fmt::Display for Fractional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a.max(1)
    } else {
        gcd(b, a % b)
    }
}
