//! Invoice error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::InvoiceStatus;
use crate::ledger::LedgerError;

/// Errors that can occur during invoice operations.
#[derive(Debug, Error)]
pub enum InvoiceError {
    // ========== Validation Errors ==========
    /// Invoice must have at least one line.
    #[error("Invoice must have at least one line")]
    EmptyLines,

    /// Line quantity must be positive.
    #[error("Line {index} has a non-positive quantity")]
    InvalidQuantity {
        /// Zero-based line index.
        index: usize,
    },

    /// Line unit price cannot be negative.
    #[error("Line {index} has a negative unit price")]
    NegativeUnitPrice {
        /// Zero-based line index.
        index: usize,
    },

    /// Line tax rate cannot be negative.
    #[error("Line {index} has a negative tax rate")]
    NegativeTaxRate {
        /// Zero-based line index.
        index: usize,
    },

    /// Contact not found in the tenant's partition.
    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),

    // ========== State Errors ==========
    /// Invoice not found in the tenant's partition.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Requested transition is not permitted from the current status.
    #[error("Cannot move invoice from {from:?} to {to:?}")]
    InvalidStateTransition {
        /// Current status.
        from: InvoiceStatus,
        /// Requested status.
        to: InvoiceStatus,
    },

    /// Allocation would push amount_paid past the invoice total.
    #[error("Allocation of {requested} exceeds amount due {amount_due}")]
    Overpayment {
        /// Remaining amount due on the invoice.
        amount_due: Decimal,
        /// Requested allocation amount.
        requested: Decimal,
    },

    // ========== Delegated / Infrastructure ==========
    /// Ledger posting failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Concurrent modification detected; safe to retry.
    #[error("Concurrent modification detected, please retry")]
    Conflict,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl InvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyLines => "EMPTY_LINES",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::NegativeUnitPrice { .. } => "NEGATIVE_UNIT_PRICE",
            Self::NegativeTaxRate { .. } => "NEGATIVE_TAX_RATE",
            Self::ContactNotFound(_) => "CONTACT_NOT_FOUND",
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::Ledger(e) => e.error_code(),
            Self::Conflict => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyLines
            | Self::InvalidQuantity { .. }
            | Self::NegativeUnitPrice { .. }
            | Self::NegativeTaxRate { .. } => 400,

            Self::InvalidStateTransition { .. } | Self::Overpayment { .. } => 422,

            Self::ContactNotFound(_) | Self::NotFound(_) => 404,

            Self::Ledger(e) => e.http_status_code(),

            Self::Conflict => 409,

            Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is transient and safe to retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Conflict => true,
            Self::Ledger(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(InvoiceError::EmptyLines.error_code(), "EMPTY_LINES");
        assert_eq!(
            InvoiceError::Overpayment {
                amount_due: dec!(400),
                requested: dec!(500)
            }
            .error_code(),
            "OVERPAYMENT"
        );
        assert_eq!(
            InvoiceError::InvalidStateTransition {
                from: InvoiceStatus::Void,
                to: InvoiceStatus::Sent
            }
            .error_code(),
            "INVALID_STATE_TRANSITION"
        );
    }

    #[test]
    fn test_ledger_errors_pass_through() {
        let err = InvoiceError::Ledger(LedgerError::Conflict);
        assert_eq!(err.error_code(), "CONFLICT");
        assert_eq!(err.http_status_code(), 409);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(InvoiceError::EmptyLines.http_status_code(), 400);
        assert_eq!(InvoiceError::NotFound(Uuid::nil()).http_status_code(), 404);
        assert_eq!(
            InvoiceError::Overpayment {
                amount_due: dec!(1),
                requested: dec!(2)
            }
            .http_status_code(),
            422
        );
        assert_eq!(InvoiceError::Conflict.http_status_code(), 409);
    }
}
