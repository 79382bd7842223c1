//! Currency rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations. All monetary
//! amounts are `rust_decimal::Decimal` rounded half-up to currency precision.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places for monetary amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount half-up to currency precision (2 decimal places).
///
/// Half-up means ties round away from zero: 0.005 → 0.01.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(1.005), dec!(1.01))]
    #[case(dec!(1.004), dec!(1.00))]
    #[case(dec!(2.675), dec!(2.68))]
    #[case(dec!(-1.005), dec!(-1.01))]
    #[case(dec!(10), dec!(10.00))]
    fn test_round_currency(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_currency(input), expected);
    }
}
