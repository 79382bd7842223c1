//! Interest calculation.

use chrono::NaiveDate;
use kassa_shared::types::round_currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InterestError;
use crate::invoice::InvoiceStatus;

/// Result of an interest calculation for one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestOutcome {
    /// Whole days past the due date as of the calculation date.
    pub days_overdue: i64,
    /// Outstanding balance the interest was computed on.
    pub principal: Decimal,
    /// Daily rate applied, as a fraction (0.0005 = 0.05% per day).
    pub daily_rate: Decimal,
    /// Accrued interest, rounded half-up to currency precision.
    pub interest: Decimal,
}

impl InterestOutcome {
    /// A zero outcome for invoices that accrue nothing.
    #[must_use]
    pub fn zero(daily_rate: Decimal) -> Self {
        Self {
            days_overdue: 0,
            principal: Decimal::ZERO,
            daily_rate,
            interest: Decimal::ZERO,
        }
    }

    /// Returns true if any interest accrued.
    #[must_use]
    pub fn accrued(&self) -> bool {
        self.interest > Decimal::ZERO
    }
}

/// Simple (non-compounding) overdue-interest calculator.
///
/// Interest accrues on the outstanding balance only, from the day after the
/// due date: `interest = amount_due * daily_rate * days_overdue`, rounded
/// half-up once at the end. Paid and voided invoices accrue nothing, and
/// neither does an invoice on or before its due date.
pub struct InterestCalculator;

impl InterestCalculator {
    /// Calculates accrued interest for an invoice snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InterestError::NegativeRate` if `daily_rate` is negative.
    pub fn calculate(
        status: InvoiceStatus,
        due_date: NaiveDate,
        amount_due: Decimal,
        daily_rate: Decimal,
        as_of: NaiveDate,
    ) -> Result<InterestOutcome, InterestError> {
        if daily_rate < Decimal::ZERO {
            return Err(InterestError::NegativeRate);
        }

        if matches!(status, InvoiceStatus::Paid | InvoiceStatus::Void) || as_of <= due_date {
            return Ok(InterestOutcome::zero(daily_rate));
        }

        let days_overdue = (as_of - due_date).num_days();
        let interest = round_currency(amount_due * daily_rate * Decimal::from(days_overdue));

        Ok(InterestOutcome {
            days_overdue,
            principal: amount_due,
            daily_rate,
            interest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_thirty_days_overdue() {
        let outcome = InterestCalculator::calculate(
            InvoiceStatus::PartiallyPaid,
            date(2026, 1, 1),
            dec!(400.00),
            dec!(0.0005),
            date(2026, 1, 31),
        )
        .unwrap();

        assert_eq!(outcome.days_overdue, 30);
        assert_eq!(outcome.principal, dec!(400.00));
        assert_eq!(outcome.interest, dec!(6.00));
        assert!(outcome.accrued());
    }

    #[rstest]
    #[case(InvoiceStatus::Paid)]
    #[case(InvoiceStatus::Void)]
    fn test_settled_invoices_accrue_nothing(#[case] status: InvoiceStatus) {
        let outcome = InterestCalculator::calculate(
            status,
            date(2026, 1, 1),
            dec!(400.00),
            dec!(0.0005),
            date(2026, 3, 1),
        )
        .unwrap();

        assert_eq!(outcome, InterestOutcome::zero(dec!(0.0005)));
        assert!(!outcome.accrued());
    }

    #[test]
    fn test_not_yet_overdue() {
        for as_of in [date(2026, 1, 1), date(2025, 12, 15)] {
            let outcome = InterestCalculator::calculate(
                InvoiceStatus::Sent,
                date(2026, 1, 1),
                dec!(1000.00),
                dec!(0.0005),
                as_of,
            )
            .unwrap();
            assert_eq!(outcome.interest, Decimal::ZERO);
            assert_eq!(outcome.days_overdue, 0);
        }
    }

    #[test]
    fn test_one_day_overdue() {
        let outcome = InterestCalculator::calculate(
            InvoiceStatus::Sent,
            date(2026, 1, 1),
            dec!(1000.00),
            dec!(0.0005),
            date(2026, 1, 2),
        )
        .unwrap();

        assert_eq!(outcome.days_overdue, 1);
        assert_eq!(outcome.interest, dec!(0.50));
    }

    #[test]
    fn test_single_rounding_at_end() {
        // 333.33 * 0.0005 * 7 = 1.166655, rounds to 1.17. Per-day rounding
        // would give 0.17 * 7 = 1.19.
        let outcome = InterestCalculator::calculate(
            InvoiceStatus::Sent,
            date(2026, 1, 1),
            dec!(333.33),
            dec!(0.0005),
            date(2026, 1, 8),
        )
        .unwrap();

        assert_eq!(outcome.interest, dec!(1.17));
    }

    #[test]
    fn test_zero_rate() {
        let outcome = InterestCalculator::calculate(
            InvoiceStatus::Sent,
            date(2026, 1, 1),
            dec!(400.00),
            Decimal::ZERO,
            date(2026, 2, 1),
        )
        .unwrap();

        assert_eq!(outcome.interest, Decimal::ZERO);
        assert_eq!(outcome.days_overdue, 31);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = InterestCalculator::calculate(
            InvoiceStatus::Sent,
            date(2026, 1, 1),
            dec!(400.00),
            dec!(-0.0005),
            date(2026, 2, 1),
        );

        assert!(matches!(result, Err(InterestError::NegativeRate)));
    }
}
