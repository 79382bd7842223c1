//! Account balance calculation rules.
//!
//! Balances are never stored; they are derived by summing journal lines and
//! normalizing the sign to the account's normal balance side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (cash, receivables).
    Asset,
    /// Liability account (payables, tax owed).
    Liability,
    /// Equity account.
    Equity,
    /// Income account.
    Income,
    /// Expense account.
    Expense,
}

/// The side on which an account normally carries its balance.
///
/// - Asset/Expense: debit-normal, balance = debits - credits
/// - Liability/Equity/Income: credit-normal, balance = credits - debits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debit-normal accounts.
    Debit,
    /// Credit-normal accounts.
    Credit,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalSide::Credit,
        }
    }
}

impl NormalSide {
    /// Normalizes raw debit/credit totals to a signed balance.
    #[must_use]
    pub fn signed_balance(self, debit_total: Decimal, credit_total: Decimal) -> Decimal {
        match self {
            Self::Debit => debit_total - credit_total,
            Self::Credit => credit_total - debit_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_sides() {
        assert_eq!(AccountType::Asset.normal_side(), NormalSide::Debit);
        assert_eq!(AccountType::Expense.normal_side(), NormalSide::Debit);
        assert_eq!(AccountType::Liability.normal_side(), NormalSide::Credit);
        assert_eq!(AccountType::Equity.normal_side(), NormalSide::Credit);
        assert_eq!(AccountType::Income.normal_side(), NormalSide::Credit);
    }

    #[test]
    fn test_debit_normal_balance() {
        let side = NormalSide::Debit;
        assert_eq!(side.signed_balance(dec!(100), dec!(0)), dec!(100));
        assert_eq!(side.signed_balance(dec!(0), dec!(50)), dec!(-50));
        assert_eq!(side.signed_balance(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_credit_normal_balance() {
        let side = NormalSide::Credit;
        assert_eq!(side.signed_balance(dec!(0), dec!(100)), dec!(100));
        assert_eq!(side.signed_balance(dec!(50), dec!(0)), dec!(-50));
        assert_eq!(side.signed_balance(dec!(30), dec!(100)), dec!(70));
    }
}
