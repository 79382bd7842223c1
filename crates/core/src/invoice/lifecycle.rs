//! Invoice status state machine.
//!
//! Transitions:
//! - draft → sent (posts the recognition entry)
//! - sent / partially_paid → partially_paid / paid (driven purely by
//!   allocation totals)
//! - any non-paid, non-void state → void (terminal)

use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::types::InvoiceStatus;

/// Checks that an invoice can be sent.
///
/// # Errors
///
/// Returns `InvalidStateTransition` unless the invoice is draft.
pub fn check_sendable(status: InvoiceStatus) -> Result<(), InvoiceError> {
    if status == InvoiceStatus::Draft {
        Ok(())
    } else {
        Err(InvoiceError::InvalidStateTransition {
            from: status,
            to: InvoiceStatus::Sent,
        })
    }
}

/// Checks that an invoice can be voided.
///
/// # Errors
///
/// Returns `InvalidStateTransition` from paid or void.
pub fn check_voidable(status: InvoiceStatus) -> Result<(), InvoiceError> {
    match status {
        InvoiceStatus::Paid | InvoiceStatus::Void => Err(InvoiceError::InvalidStateTransition {
            from: status,
            to: InvoiceStatus::Void,
        }),
        _ => Ok(()),
    }
}

/// Status implied by the paid amount, for an invoice that has been sent.
///
/// Callers keep the current status when `amount_paid` is zero.
#[must_use]
pub fn status_for_amount_paid(total: Decimal, amount_paid: Decimal) -> InvoiceStatus {
    if amount_paid >= total {
        InvoiceStatus::Paid
    } else if amount_paid > Decimal::ZERO {
        InvoiceStatus::PartiallyPaid
    } else {
        InvoiceStatus::Sent
    }
}

/// Applies an allocation to an invoice's paid amount.
///
/// Returns the new paid amount and the resulting status.
///
/// # Errors
///
/// Returns `InvalidStateTransition` if the status does not accept
/// allocations, or `Overpayment` if the allocation would exceed the total.
pub fn apply_allocation(
    status: InvoiceStatus,
    total: Decimal,
    amount_paid: Decimal,
    allocation: Decimal,
) -> Result<(Decimal, InvoiceStatus), InvoiceError> {
    if !status.accepts_allocations() {
        return Err(InvoiceError::InvalidStateTransition {
            from: status,
            to: InvoiceStatus::PartiallyPaid,
        });
    }

    let new_paid = amount_paid + allocation;
    if new_paid > total {
        return Err(InvoiceError::Overpayment {
            amount_due: total - amount_paid,
            requested: allocation,
        });
    }

    Ok((new_paid, status_for_amount_paid(total, new_paid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_draft_is_sendable() {
        assert!(check_sendable(InvoiceStatus::Draft).is_ok());
        for status in [
            InvoiceStatus::Sent,
            InvoiceStatus::PartiallyPaid,
            InvoiceStatus::Paid,
            InvoiceStatus::Void,
        ] {
            assert!(matches!(
                check_sendable(status),
                Err(InvoiceError::InvalidStateTransition { .. })
            ));
        }
    }

    #[rstest]
    #[case(InvoiceStatus::Draft, true)]
    #[case(InvoiceStatus::Sent, true)]
    #[case(InvoiceStatus::PartiallyPaid, true)]
    #[case(InvoiceStatus::Paid, false)]
    #[case(InvoiceStatus::Void, false)]
    fn test_voidable(#[case] status: InvoiceStatus, #[case] expected: bool) {
        assert_eq!(check_voidable(status).is_ok(), expected);
    }

    #[test]
    fn test_status_for_amount_paid() {
        let total = dec!(1000.00);
        assert_eq!(
            status_for_amount_paid(total, dec!(0)),
            InvoiceStatus::Sent
        );
        assert_eq!(
            status_for_amount_paid(total, dec!(600.00)),
            InvoiceStatus::PartiallyPaid
        );
        assert_eq!(
            status_for_amount_paid(total, dec!(1000.00)),
            InvoiceStatus::Paid
        );
    }

    #[test]
    fn test_allocation_scenario() {
        // invoice total 1000.00: 600.00 then 400.00, then any further amount fails
        let total = dec!(1000.00);

        let (paid, status) =
            apply_allocation(InvoiceStatus::Sent, total, dec!(0), dec!(600.00)).unwrap();
        assert_eq!(paid, dec!(600.00));
        assert_eq!(status, InvoiceStatus::PartiallyPaid);
        assert_eq!(total - paid, dec!(400.00));

        let (paid, status) = apply_allocation(status, total, paid, dec!(400.00)).unwrap();
        assert_eq!(paid, dec!(1000.00));
        assert_eq!(status, InvoiceStatus::Paid);
        assert_eq!(total - paid, dec!(0.00));

        let result = apply_allocation(status, total, paid, dec!(0.01));
        assert!(matches!(
            result,
            Err(InvoiceError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_overpayment_rejected() {
        let result = apply_allocation(
            InvoiceStatus::PartiallyPaid,
            dec!(1000.00),
            dec!(700.00),
            dec!(300.01),
        );
        assert!(matches!(
            result,
            Err(InvoiceError::Overpayment { amount_due, requested })
                if amount_due == dec!(300.00) && requested == dec!(300.01)
        ));
    }

    #[test]
    fn test_exact_exhaustion_is_not_special() {
        let (paid, status) = apply_allocation(
            InvoiceStatus::Sent,
            dec!(250.00),
            dec!(0),
            dec!(250.00),
        )
        .unwrap();
        assert_eq!(paid, dec!(250.00));
        assert_eq!(status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_draft_rejects_allocation() {
        let result = apply_allocation(InvoiceStatus::Draft, dec!(100), dec!(0), dec!(10));
        assert!(matches!(
            result,
            Err(InvoiceError::InvalidStateTransition { .. })
        ));
    }
}
