//! Property tests for the allocation policy.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::policy::{AllocationCheck, AllocationPolicy};
use super::types::PaymentDirection;
use crate::invoice::{InvoiceStatus, InvoiceType};

fn cents(n: i64) -> Decimal {
    Decimal::new(n, 2)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Simulates a payment being allocated across invoices: however the
    /// caller sequences allocations, the accepted total never exceeds the
    /// payment amount.
    #[test]
    fn prop_payment_never_overallocated(
        payment_cents in 100i64..10_000_000i64,
        requests in prop::collection::vec(1i64..5_000_000i64, 1..12),
    ) {
        let payment_amount = cents(payment_cents);
        let mut allocated = Decimal::ZERO;

        for request in requests {
            let amount = cents(request);
            let unallocated = payment_amount - allocated;
            let check = AllocationCheck {
                amount,
                payment_direction: PaymentDirection::Received,
                payment_unallocated: unallocated,
                invoice_type: InvoiceType::Sales,
                invoice_status: InvoiceStatus::Sent,
                // generous invoice so the payment side is the binding limit
                invoice_amount_due: cents(i64::MAX / 2),
            };
            if AllocationPolicy::check(check).is_ok() {
                allocated += amount;
            }
            prop_assert!(allocated <= payment_amount);
        }
    }

    /// An allocation passes iff it fits within BOTH the payment's
    /// unallocated balance and the invoice's amount due.
    #[test]
    fn prop_check_matches_min_of_limits(
        amount in 1i64..1_000_000i64,
        unallocated in 0i64..1_000_000i64,
        due in 0i64..1_000_000i64,
    ) {
        let check = AllocationCheck {
            amount: cents(amount),
            payment_direction: PaymentDirection::Made,
            payment_unallocated: cents(unallocated),
            invoice_type: InvoiceType::Purchase,
            invoice_status: InvoiceStatus::PartiallyPaid,
            invoice_amount_due: cents(due),
        };

        let fits = amount <= unallocated && amount <= due;
        prop_assert_eq!(AllocationPolicy::check(check).is_ok(), fits);
    }

    /// Mismatched directions never pass, regardless of balances.
    #[test]
    fn prop_direction_mismatch_always_rejected(
        amount in 1i64..1_000_000i64,
        limit in 1_000_000i64..2_000_000i64,
    ) {
        for (direction, invoice_type) in [
            (PaymentDirection::Received, InvoiceType::Purchase),
            (PaymentDirection::Made, InvoiceType::Sales),
        ] {
            let check = AllocationCheck {
                amount: cents(amount),
                payment_direction: direction,
                payment_unallocated: cents(limit),
                invoice_type,
                invoice_status: InvoiceStatus::Sent,
                invoice_amount_due: cents(limit),
            };
            prop_assert!(AllocationPolicy::check(check).is_err());
        }
    }
}
