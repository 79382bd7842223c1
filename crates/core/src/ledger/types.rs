//! Input and intermediate types for posting journal entries.

use chrono::NaiveDate;
use kassa_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Input for a single journal line.
///
/// Exactly one of `debit`/`credit` must be positive; the other must be zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero if crediting).
    pub debit: Decimal,
    /// Credit amount (zero if debiting).
    pub credit: Decimal,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

impl JournalLineInput {
    /// Convenience constructor for a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    /// Convenience constructor for a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }

    /// Returns this line with debit and credit swapped.
    ///
    /// Used to build reversing entries.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            memo: self.memo.clone(),
        }
    }
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// Effective date of the entry.
    pub entry_date: NaiveDate,
    /// Description of the business event.
    pub memo: Option<String>,
    /// The lines (at least 2, balanced).
    pub lines: Vec<JournalLineInput>,
}

/// A line that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedLine {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// A validated, balanced entry ready for persistence.
#[derive(Debug, Clone)]
pub struct ValidatedEntry {
    /// Effective date of the entry.
    pub entry_date: NaiveDate,
    /// Description of the business event.
    pub memo: Option<String>,
    /// The validated lines.
    pub lines: Vec<ValidatedLine>,
    /// Total debit amount (equals total credit).
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constructors_set_one_side() {
        let d = JournalLineInput::debit(AccountId::new(), dec!(25));
        assert_eq!(d.debit, dec!(25));
        assert_eq!(d.credit, Decimal::ZERO);

        let c = JournalLineInput::credit(AccountId::new(), dec!(25));
        assert_eq!(c.debit, Decimal::ZERO);
        assert_eq!(c.credit, dec!(25));
    }

    #[test]
    fn test_swapped_negates_effect() {
        let d = JournalLineInput::debit(AccountId::new(), dec!(25));
        let s = d.swapped();
        assert_eq!(s.debit, Decimal::ZERO);
        assert_eq!(s.credit, dec!(25));
        assert_eq!(s.account_id, d.account_id);
    }
}
