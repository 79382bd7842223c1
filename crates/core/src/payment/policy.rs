//! Allocation policy.
//!
//! Pure check-then-act validation for allocating part of a payment to an
//! invoice. The repository serializes concurrent callers with row locks; this
//! policy assumes the snapshot it is given is stable for the transaction.

use rust_decimal::Decimal;

use super::error::PaymentError;
use super::types::PaymentDirection;
use crate::invoice::{InvoiceStatus, InvoiceType};

/// Snapshot of the state an allocation is validated against.
#[derive(Debug, Clone, Copy)]
pub struct AllocationCheck {
    /// Requested allocation amount.
    pub amount: Decimal,
    /// The payment's direction.
    pub payment_direction: PaymentDirection,
    /// The payment's remaining unallocated amount.
    pub payment_unallocated: Decimal,
    /// The invoice's type.
    pub invoice_type: InvoiceType,
    /// The invoice's current status.
    pub invoice_status: InvoiceStatus,
    /// The invoice's remaining amount due.
    pub invoice_amount_due: Decimal,
}

/// Allocation validation policy.
pub struct AllocationPolicy;

impl AllocationPolicy {
    /// Validates an allocation against the snapshot.
    ///
    /// Checks, in order: positive amount, direction compatibility, invoice
    /// status, payment unallocated balance, invoice amount due. Partial
    /// allocation is normal; exact exhaustion of either side needs no
    /// special case.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` describing the first violation found.
    pub fn check(check: AllocationCheck) -> Result<(), PaymentError> {
        if check.amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }

        if !check.payment_direction.settles(check.invoice_type) {
            return Err(PaymentError::DirectionMismatch {
                payment: check.payment_direction,
                invoice: check.invoice_type,
            });
        }

        if !check.invoice_status.accepts_allocations() {
            return Err(PaymentError::InvoiceNotAllocatable(check.invoice_status));
        }

        if check.amount > check.payment_unallocated {
            return Err(PaymentError::InsufficientPaymentBalance {
                unallocated: check.payment_unallocated,
                requested: check.amount,
            });
        }

        if check.amount > check.invoice_amount_due {
            return Err(PaymentError::Invoice(
                crate::invoice::InvoiceError::Overpayment {
                    amount_due: check.invoice_amount_due,
                    requested: check.amount,
                },
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::InvoiceError;
    use rust_decimal_macros::dec;

    fn check(amount: Decimal, unallocated: Decimal, due: Decimal) -> AllocationCheck {
        AllocationCheck {
            amount,
            payment_direction: PaymentDirection::Received,
            payment_unallocated: unallocated,
            invoice_type: InvoiceType::Sales,
            invoice_status: InvoiceStatus::Sent,
            invoice_amount_due: due,
        }
    }

    #[test]
    fn test_valid_partial_allocation() {
        assert!(AllocationPolicy::check(check(dec!(100), dec!(600), dec!(1000))).is_ok());
    }

    #[test]
    fn test_exact_exhaustion_both_sides() {
        assert!(AllocationPolicy::check(check(dec!(400), dec!(400), dec!(400))).is_ok());
    }

    #[test]
    fn test_non_positive_amount() {
        assert!(matches!(
            AllocationPolicy::check(check(dec!(0), dec!(600), dec!(1000))),
            Err(PaymentError::NonPositiveAmount)
        ));
        assert!(matches!(
            AllocationPolicy::check(check(dec!(-5), dec!(600), dec!(1000))),
            Err(PaymentError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_payment_overdraw_rejected() {
        assert!(matches!(
            AllocationPolicy::check(check(dec!(700), dec!(600), dec!(1000))),
            Err(PaymentError::InsufficientPaymentBalance { unallocated, requested })
                if unallocated == dec!(600) && requested == dec!(700)
        ));
    }

    #[test]
    fn test_invoice_overdraw_rejected() {
        assert!(matches!(
            AllocationPolicy::check(check(dec!(500), dec!(600), dec!(400))),
            Err(PaymentError::Invoice(InvoiceError::Overpayment { amount_due, requested }))
                if amount_due == dec!(400) && requested == dec!(500)
        ));
    }

    #[test]
    fn test_direction_mismatch() {
        let mut c = check(dec!(100), dec!(600), dec!(1000));
        c.invoice_type = InvoiceType::Purchase;
        assert!(matches!(
            AllocationPolicy::check(c),
            Err(PaymentError::DirectionMismatch { .. })
        ));
    }

    #[test]
    fn test_invoice_status_gate() {
        for status in [InvoiceStatus::Draft, InvoiceStatus::Paid, InvoiceStatus::Void] {
            let mut c = check(dec!(100), dec!(600), dec!(1000));
            c.invoice_status = status;
            assert!(matches!(
                AllocationPolicy::check(c),
                Err(PaymentError::InvoiceNotAllocatable(s)) if s == status
            ));
        }
    }
}
