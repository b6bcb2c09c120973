//! Monetary types for odds and stake representation.

use rust_decimal::Decimal;

/// Decimal odds represented as a Decimal for precision.
pub type Price = Decimal;

/// Stake or payout amount in currency units.
pub type Stake = Decimal;

/// Percentage value (3.5 means 3.5%).
pub type Percent = Decimal;

/// One hundred, for percentage conversions.
pub(crate) const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_and_stake_are_decimal() {
        let price: Price = dec!(2.10);
        let stake: Stake = dec!(100);

        assert_eq!(price * stake, dec!(210.00));
    }
}
