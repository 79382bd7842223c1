//! Ledger error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// A line has both debit and credit set.
    #[error("Line {index} has both debit and credit set")]
    LineBothSides {
        /// Zero-based line index.
        index: usize,
    },

    /// A line has neither debit nor credit set.
    #[error("Line {index} has neither debit nor credit set")]
    LineNoSide {
        /// Zero-based line index.
        index: usize,
    },

    /// A line has a negative amount.
    #[error("Line {index} has a negative amount")]
    LineNegative {
        /// Zero-based line index.
        index: usize,
    },

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    ImbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account not found in the tenant's partition.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),

    /// Account code already exists in the tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateAccountCode(String),

    /// No account carries the required system tag.
    #[error("No account tagged '{0}' configured for this tenant")]
    SystemAccountMissing(String),

    // ========== Entry State Errors ==========
    /// Journal entry not found in the tenant's partition.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Entry has already been reversed.
    #[error("Journal entry {0} has already been voided")]
    AlreadyVoided(Uuid),

    // ========== Concurrency / Infrastructure ==========
    /// Concurrent modification detected; safe to retry.
    #[error("Concurrent modification detected, please retry")]
    Conflict,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::LineBothSides { .. } => "LINE_BOTH_SIDES",
            Self::LineNoSide { .. } => "LINE_NO_SIDE",
            Self::LineNegative { .. } => "LINE_NEGATIVE",
            Self::ImbalancedEntry { .. } => "IMBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::SystemAccountMissing(_) => "SYSTEM_ACCOUNT_MISSING",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyVoided(_) => "ALREADY_VOIDED",
            Self::Conflict => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InsufficientLines
            | Self::LineBothSides { .. }
            | Self::LineNoSide { .. }
            | Self::LineNegative { .. }
            | Self::ImbalancedEntry { .. }
            | Self::AccountInactive(_)
            | Self::DuplicateAccountCode(_) => 400,

            Self::SystemAccountMissing(_) | Self::AlreadyVoided(_) => 422,

            Self::AccountNotFound(_) | Self::EntryNotFound(_) => 404,

            Self::Conflict => 409,

            Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is transient and safe to retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InsufficientLines.error_code(),
            "INSUFFICIENT_LINES"
        );
        assert_eq!(
            LedgerError::ImbalancedEntry {
                debit: dec!(100),
                credit: dec!(90)
            }
            .error_code(),
            "IMBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::AlreadyVoided(Uuid::nil()).error_code(),
            "ALREADY_VOIDED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InsufficientLines.http_status_code(), 400);
        assert_eq!(
            LedgerError::EntryNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::AlreadyVoided(Uuid::nil()).http_status_code(),
            422
        );
        assert_eq!(LedgerError::Conflict.http_status_code(), 409);
        assert_eq!(
            LedgerError::Database("x".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_retryable() {
        assert!(LedgerError::Conflict.is_retryable());
        assert!(!LedgerError::InsufficientLines.is_retryable());
        assert!(!LedgerError::Database(String::new()).is_retryable());
    }

    #[test]
    fn test_imbalanced_display() {
        let err = LedgerError::ImbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(90.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 90.00"
        );
    }
}
