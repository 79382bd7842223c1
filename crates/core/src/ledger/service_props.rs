//! Property tests for entry validation and reversal.

use chrono::NaiveDate;
use kassa_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::LedgerService;
use super::types::{JournalLineInput, PostEntryInput};

/// Strategy for positive line amounts with 2 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a balanced entry: n debit amounts mirrored by one credit
/// line carrying the total.
fn balanced_lines_strategy() -> impl Strategy<Value = Vec<JournalLineInput>> {
    prop::collection::vec(amount_strategy(), 1..8).prop_map(|amounts| {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<JournalLineInput> = amounts
            .into_iter()
            .map(|a| JournalLineInput::debit(AccountId::new(), a))
            .collect();
        lines.push(JournalLineInput::credit(AccountId::new(), total));
        lines
    })
}

fn input(lines: Vec<JournalLineInput>) -> PostEntryInput {
    PostEntryInput {
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        memo: None,
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any constructed balanced entry passes validation and its total equals
    /// the sum of debits.
    #[test]
    fn prop_balanced_entries_validate(lines in balanced_lines_strategy()) {
        let validated = LedgerService::validate(&input(lines.clone())).unwrap();

        let debit_sum: Decimal = lines.iter().map(|l| l.debit).sum();
        prop_assert_eq!(validated.total, debit_sum);
        prop_assert_eq!(validated.lines.len(), lines.len());
    }

    /// Perturbing one side of a balanced entry makes validation fail with
    /// an imbalance error carrying the exact totals.
    #[test]
    fn prop_perturbed_entries_rejected(
        lines in balanced_lines_strategy(),
        delta in 1i64..10_000i64,
    ) {
        let mut lines = lines;
        let last = lines.len() - 1;
        lines[last].credit += Decimal::new(delta, 2);

        let result = LedgerService::validate(&input(lines.clone()));
        let debit_sum: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit_sum: Decimal = lines.iter().map(|l| l.credit).sum();

        match result {
            Err(super::error::LedgerError::ImbalancedEntry { debit, credit }) => {
                prop_assert_eq!(debit, debit_sum);
                prop_assert_eq!(credit, credit_sum);
            }
            other => prop_assert!(false, "expected imbalance, got {other:?}"),
        }
    }

    /// Swapping every line's sides (the reversal construction) keeps the
    /// entry balanced and negates the signed effect on every account.
    #[test]
    fn prop_reversal_negates(lines in balanced_lines_strategy()) {
        let swapped: Vec<JournalLineInput> = lines.iter().map(JournalLineInput::swapped).collect();

        let original = LedgerService::validate(&input(lines)).unwrap();
        let reversal = LedgerService::validate(&input(swapped)).unwrap();

        prop_assert_eq!(original.total, reversal.total);
        for (o, r) in original.lines.iter().zip(reversal.lines.iter()) {
            prop_assert_eq!(o.account_id, r.account_id);
            prop_assert_eq!(o.debit - o.credit, -(r.debit - r.credit));
        }
    }

    /// Validation is deterministic.
    #[test]
    fn prop_validation_deterministic(lines in balanced_lines_strategy()) {
        let a = LedgerService::validate(&input(lines.clone())).unwrap();
        let b = LedgerService::validate(&input(lines)).unwrap();
        prop_assert_eq!(a.total, b.total);
    }
}
