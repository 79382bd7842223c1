//! Entry validation service.
//!
//! Pure business logic with no database dependencies: validates a candidate
//! journal entry before the repository persists it.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{PostEntryInput, ValidatedEntry, ValidatedLine};

/// Totals for a set of journal lines.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Returns true if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Ledger service for entry validation.
pub struct LedgerService;

impl LedgerService {
    /// Validates a candidate entry.
    ///
    /// Checks, in order:
    /// 1. At least 2 lines
    /// 2. Each line has exactly one positive side (no negatives, no
    ///    both-sides, no empty lines)
    /// 3. Sum of debits equals sum of credits exactly - no tolerance
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` describing the first violation found.
    pub fn validate(input: &PostEntryInput) -> Result<ValidatedEntry, LedgerError> {
        if input.lines.len() < 2 {
            return Err(LedgerError::InsufficientLines);
        }

        let mut lines = Vec::with_capacity(input.lines.len());
        for (index, line) in input.lines.iter().enumerate() {
            if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
                return Err(LedgerError::LineNegative { index });
            }
            let has_debit = line.debit > Decimal::ZERO;
            let has_credit = line.credit > Decimal::ZERO;
            match (has_debit, has_credit) {
                (true, true) => return Err(LedgerError::LineBothSides { index }),
                (false, false) => return Err(LedgerError::LineNoSide { index }),
                _ => {}
            }

            lines.push(ValidatedLine {
                account_id: line.account_id,
                debit: line.debit,
                credit: line.credit,
                memo: line.memo.clone(),
            });
        }

        let totals = Self::totals(&lines);
        if !totals.is_balanced() {
            return Err(LedgerError::ImbalancedEntry {
                debit: totals.debit,
                credit: totals.credit,
            });
        }

        Ok(ValidatedEntry {
            entry_date: input.entry_date,
            memo: input.memo.clone(),
            total: totals.debit,
            lines,
        })
    }

    /// Calculates debit/credit totals over validated lines.
    #[must_use]
    pub fn totals(lines: &[ValidatedLine]) -> EntryTotals {
        EntryTotals {
            debit: lines.iter().map(|l| l.debit).sum(),
            credit: lines.iter().map(|l| l.credit).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::JournalLineInput;
    use chrono::NaiveDate;
    use kassa_shared::types::AccountId;
    use rust_decimal_macros::dec;

    fn input(lines: Vec<JournalLineInput>) -> PostEntryInput {
        PostEntryInput {
            entry_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            memo: Some("Test entry".to_string()),
            lines,
        }
    }

    #[test]
    fn test_validate_balanced_entry() {
        let result = LedgerService::validate(&input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(100)),
            JournalLineInput::credit(AccountId::new(), dec!(100)),
        ]));

        let entry = result.unwrap();
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.total, dec!(100));
    }

    #[test]
    fn test_validate_imbalanced_entry() {
        let result = LedgerService::validate(&input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(100)),
            JournalLineInput::credit(AccountId::new(), dec!(90)),
        ]));

        assert!(matches!(
            result,
            Err(LedgerError::ImbalancedEntry { debit, credit })
                if debit == dec!(100) && credit == dec!(90)
        ));
    }

    #[test]
    fn test_validate_insufficient_lines() {
        let result = LedgerService::validate(&input(vec![JournalLineInput::debit(
            AccountId::new(),
            dec!(100),
        )]));
        assert!(matches!(result, Err(LedgerError::InsufficientLines)));
    }

    #[test]
    fn test_validate_line_both_sides() {
        let bad = JournalLineInput {
            account_id: AccountId::new(),
            debit: dec!(50),
            credit: dec!(50),
            memo: None,
        };
        let result = LedgerService::validate(&input(vec![
            bad,
            JournalLineInput::credit(AccountId::new(), dec!(50)),
        ]));
        assert!(matches!(
            result,
            Err(LedgerError::LineBothSides { index: 0 })
        ));
    }

    #[test]
    fn test_validate_line_no_side() {
        let empty = JournalLineInput {
            account_id: AccountId::new(),
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            memo: None,
        };
        let result = LedgerService::validate(&input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(10)),
            empty,
        ]));
        assert!(matches!(result, Err(LedgerError::LineNoSide { index: 1 })));
    }

    #[test]
    fn test_validate_negative_amount() {
        let negative = JournalLineInput {
            account_id: AccountId::new(),
            debit: dec!(-100),
            credit: Decimal::ZERO,
            memo: None,
        };
        let result = LedgerService::validate(&input(vec![
            negative,
            JournalLineInput::credit(AccountId::new(), dec!(100)),
        ]));
        assert!(matches!(result, Err(LedgerError::LineNegative { index: 0 })));
    }

    #[test]
    fn test_exact_decimal_equality_no_tolerance() {
        // 0.01 off is imbalanced, no rounding forgiveness
        let result = LedgerService::validate(&input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(100.00)),
            JournalLineInput::credit(AccountId::new(), dec!(99.99)),
        ]));
        assert!(matches!(result, Err(LedgerError::ImbalancedEntry { .. })));
    }

    #[test]
    fn test_multi_line_entry() {
        // AR 110 = income 100 + tax 10
        let result = LedgerService::validate(&input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(110)),
            JournalLineInput::credit(AccountId::new(), dec!(100)),
            JournalLineInput::credit(AccountId::new(), dec!(10)),
        ]));
        let entry = result.unwrap();
        assert_eq!(entry.total, dec!(110));
        assert_eq!(entry.lines.len(), 3);
    }
}
