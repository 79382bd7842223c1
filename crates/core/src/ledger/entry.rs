//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use kassa_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Journal entry status.
///
/// Posted entries are immutable; the only correction mechanism is a new
/// reversing entry, after which the original is marked void.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry has not been committed to the ledger.
    Draft,
    /// Entry is committed and authoritative.
    Posted,
    /// Entry has been reversed; retained for audit.
    Void,
}

impl EntryStatus {
    /// Returns true if the entry's lines contribute to balance sums.
    ///
    /// Voided entries still count: their posted reversal nets them to zero,
    /// and as-of-date queries before the reversal must see the original.
    #[must_use]
    pub const fn counts_toward_balance(self) -> bool {
        matches!(self, Self::Posted | Self::Void)
    }

    /// Returns true if the entry can be reversed.
    #[must_use]
    pub const fn can_reverse(self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// A single debit or credit against one account.
///
/// Exactly one of `debit`/`credit` is positive; the other is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: JournalLineId,
    /// The entry this line belongs to.
    pub entry_id: JournalEntryId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Optional description for this line.
    pub memo: Option<String>,
}

impl JournalLine {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A balanced set of journal lines representing one business event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Tenant this entry belongs to.
    pub tenant_id: TenantId,
    /// Effective date of the entry.
    pub entry_date: NaiveDate,
    /// Description of the business event.
    pub memo: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// Entry this one reverses, if it is a reversing entry.
    pub reversal_of: Option<JournalEntryId>,
    /// Forward pointer to the reversing entry, set when this entry is voided.
    pub reversed_by: Option<JournalEntryId>,
    /// User who created the entry.
    pub created_by: UserId,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// Ordered lines (populated when needed).
    #[serde(default)]
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn debit_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn credit_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Returns true if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit_total() == self.credit_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(debit: Decimal, credit: Decimal) -> JournalLine {
        JournalLine {
            id: JournalLineId::new(),
            entry_id: JournalEntryId::new(),
            account_id: AccountId::new(),
            debit,
            credit,
            memo: None,
        }
    }

    fn entry(lines: Vec<JournalLine>) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::new(),
            tenant_id: TenantId::new(),
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            memo: None,
            status: EntryStatus::Posted,
            reversal_of: None,
            reversed_by: None,
            created_by: UserId::new(),
            created_at: Utc::now(),
            lines,
        }
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(line(dec!(100), dec!(0)).signed_amount(), dec!(100));
        assert_eq!(line(dec!(0), dec!(40)).signed_amount(), dec!(-40));
    }

    #[test]
    fn test_entry_totals_and_balance() {
        let e = entry(vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))]);
        assert_eq!(e.debit_total(), dec!(100));
        assert_eq!(e.credit_total(), dec!(100));
        assert!(e.is_balanced());

        let e = entry(vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(90))]);
        assert!(!e.is_balanced());
    }

    #[test]
    fn test_status_rules() {
        assert!(EntryStatus::Posted.counts_toward_balance());
        assert!(EntryStatus::Void.counts_toward_balance());
        assert!(!EntryStatus::Draft.counts_toward_balance());

        assert!(EntryStatus::Posted.can_reverse());
        assert!(!EntryStatus::Void.can_reverse());
        assert!(!EntryStatus::Draft.can_reverse());
    }
}
