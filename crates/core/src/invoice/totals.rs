//! Invoice totals computation.
//!
//! Amounts are rounded half-up to currency precision at the line level, then
//! summed. Rounding once per line (not once per invoice) keeps each printed
//! line amount consistent with the total.

use kassa_shared::types::round_currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;
use super::types::InvoiceLineInput;

/// Computed amounts for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    /// quantity × unit_price, rounded half-up.
    pub subtotal: Decimal,
    /// subtotal × tax_rate, rounded half-up.
    pub tax: Decimal,
}

impl LineTotals {
    /// Line subtotal plus tax.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal + self.tax
    }
}

/// Computed amounts for a whole invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Sum of line taxes.
    pub tax: Decimal,
    /// subtotal + tax.
    pub total: Decimal,
}

impl InvoiceTotals {
    /// Validates lines and computes per-line and invoice totals.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` if lines are empty, a quantity is non-positive,
    /// or a unit price / tax rate is negative.
    pub fn from_lines(
        lines: &[InvoiceLineInput],
    ) -> Result<(Vec<LineTotals>, Self), InvoiceError> {
        if lines.is_empty() {
            return Err(InvoiceError::EmptyLines);
        }

        let mut line_totals = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            if line.quantity <= Decimal::ZERO {
                return Err(InvoiceError::InvalidQuantity { index });
            }
            if line.unit_price < Decimal::ZERO {
                return Err(InvoiceError::NegativeUnitPrice { index });
            }
            if line.tax_rate < Decimal::ZERO {
                return Err(InvoiceError::NegativeTaxRate { index });
            }

            let subtotal = round_currency(line.quantity * line.unit_price);
            let tax = round_currency(subtotal * line.tax_rate);
            line_totals.push(LineTotals { subtotal, tax });
        }

        let subtotal: Decimal = line_totals.iter().map(|l| l.subtotal).sum();
        let tax: Decimal = line_totals.iter().map(|l| l.tax).sum();

        Ok((
            line_totals,
            Self {
                subtotal,
                tax,
                total: subtotal + tax,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, unit_price: Decimal, tax_rate: Decimal) -> InvoiceLineInput {
        InvoiceLineInput {
            description: "Widget".to_string(),
            quantity,
            unit_price,
            tax_rate,
        }
    }

    #[test]
    fn test_single_line_totals() {
        let (lines, totals) =
            InvoiceTotals::from_lines(&[line(dec!(4), dec!(250.00), dec!(0))]).unwrap();
        assert_eq!(lines[0].subtotal, dec!(1000.00));
        assert_eq!(lines[0].tax, dec!(0.00));
        assert_eq!(totals.total, dec!(1000.00));
    }

    #[test]
    fn test_tax_applied_per_line() {
        let (lines, totals) =
            InvoiceTotals::from_lines(&[line(dec!(2), dec!(50.00), dec!(0.10))]).unwrap();
        assert_eq!(lines[0].subtotal, dec!(100.00));
        assert_eq!(lines[0].tax, dec!(10.00));
        assert_eq!(totals.subtotal, dec!(100.00));
        assert_eq!(totals.tax, dec!(10.00));
        assert_eq!(totals.total, dec!(110.00));
    }

    #[test]
    fn test_line_level_half_up_rounding() {
        // 3 × 0.335 = 1.005 → 1.01 at the line level
        let (lines, totals) =
            InvoiceTotals::from_lines(&[line(dec!(3), dec!(0.335), dec!(0))]).unwrap();
        assert_eq!(lines[0].subtotal, dec!(1.01));
        assert_eq!(totals.total, dec!(1.01));
    }

    #[test]
    fn test_rounding_happens_before_summing() {
        // Two lines of 1.005 each: rounded per line (1.01 + 1.01 = 2.02),
        // not on the sum (2.01).
        let (_, totals) = InvoiceTotals::from_lines(&[
            line(dec!(3), dec!(0.335), dec!(0)),
            line(dec!(3), dec!(0.335), dec!(0)),
        ])
        .unwrap();
        assert_eq!(totals.total, dec!(2.02));
    }

    #[test]
    fn test_empty_lines_rejected() {
        assert!(matches!(
            InvoiceTotals::from_lines(&[]),
            Err(InvoiceError::EmptyLines)
        ));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert!(matches!(
            InvoiceTotals::from_lines(&[line(dec!(0), dec!(10), dec!(0))]),
            Err(InvoiceError::InvalidQuantity { index: 0 })
        ));
        assert!(matches!(
            InvoiceTotals::from_lines(&[
                line(dec!(1), dec!(10), dec!(0)),
                line(dec!(-2), dec!(10), dec!(0))
            ]),
            Err(InvoiceError::InvalidQuantity { index: 1 })
        ));
    }

    #[test]
    fn test_negative_price_and_rate_rejected() {
        assert!(matches!(
            InvoiceTotals::from_lines(&[line(dec!(1), dec!(-10), dec!(0))]),
            Err(InvoiceError::NegativeUnitPrice { index: 0 })
        ));
        assert!(matches!(
            InvoiceTotals::from_lines(&[line(dec!(1), dec!(10), dec!(-0.1))]),
            Err(InvoiceError::NegativeTaxRate { index: 0 })
        ));
    }

    #[test]
    fn test_mixed_lines_sum() {
        let (_, totals) = InvoiceTotals::from_lines(&[
            line(dec!(10), dec!(45.50), dec!(0.20)),
            line(dec!(1), dec!(99.99), dec!(0)),
        ])
        .unwrap();
        // 455.00 + 91.00 tax, plus 99.99
        assert_eq!(totals.subtotal, dec!(554.99));
        assert_eq!(totals.tax, dec!(91.00));
        assert_eq!(totals.total, dec!(645.99));
    }
}
