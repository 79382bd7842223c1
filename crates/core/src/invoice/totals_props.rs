//! Property tests for invoice totals and allocation application.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::lifecycle::apply_allocation;
use super::totals::InvoiceTotals;
use super::types::{InvoiceLineInput, InvoiceStatus};

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000i64).prop_map(Decimal::from)
}

fn price_strategy() -> impl Strategy<Value = Decimal> {
    // up to 4 decimal places so line rounding actually triggers
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn tax_rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..30i64).prop_map(|n| Decimal::new(n, 2))
}

fn lines_strategy() -> impl Strategy<Value = Vec<InvoiceLineInput>> {
    prop::collection::vec(
        (quantity_strategy(), price_strategy(), tax_rate_strategy()).prop_map(
            |(quantity, unit_price, tax_rate)| InvoiceLineInput {
                description: "line".to_string(),
                quantity,
                unit_price,
                tax_rate,
            },
        ),
        1..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Invoice totals are exactly the sum of the (already rounded) line
    /// totals, and every line amount has at most 2 decimal places.
    #[test]
    fn prop_totals_are_sum_of_lines(lines in lines_strategy()) {
        let (line_totals, totals) = InvoiceTotals::from_lines(&lines).unwrap();

        let subtotal: Decimal = line_totals.iter().map(|l| l.subtotal).sum();
        let tax: Decimal = line_totals.iter().map(|l| l.tax).sum();

        prop_assert_eq!(totals.subtotal, subtotal);
        prop_assert_eq!(totals.tax, tax);
        prop_assert_eq!(totals.total, subtotal + tax);

        for lt in &line_totals {
            prop_assert!(lt.subtotal.scale() <= 2);
            prop_assert!(lt.tax.scale() <= 2);
            prop_assert!(lt.subtotal >= Decimal::ZERO);
            prop_assert!(lt.tax >= Decimal::ZERO);
        }
    }

    /// Applying any sequence of positive allocations never lets amount_paid
    /// exceed the total, and the status tracks the paid amount.
    #[test]
    fn prop_allocations_never_overdraw(
        total_cents in 100i64..10_000_000i64,
        chunks in prop::collection::vec(1i64..5_000_000i64, 1..10),
    ) {
        let total = Decimal::new(total_cents, 2);
        let mut paid = Decimal::ZERO;
        let mut status = InvoiceStatus::Sent;

        for chunk in chunks {
            let amount = Decimal::new(chunk, 2);
            match apply_allocation(status, total, paid, amount) {
                Ok((new_paid, new_status)) => {
                    prop_assert!(new_paid <= total);
                    prop_assert!(new_paid > paid);
                    paid = new_paid;
                    status = new_status;
                }
                Err(_) => {
                    // rejected allocations must not change state
                    prop_assert!(paid <= total);
                }
            }
        }

        if paid == total {
            prop_assert_eq!(status, InvoiceStatus::Paid);
        } else if paid > Decimal::ZERO {
            prop_assert_eq!(status, InvoiceStatus::PartiallyPaid);
        }
    }
}
