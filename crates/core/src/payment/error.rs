//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::PaymentDirection;
use crate::invoice::{InvoiceError, InvoiceStatus, InvoiceType};
use crate::ledger::LedgerError;

/// Errors that can occur during payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    // ========== Validation Errors ==========
    /// Payment or allocation amount must be positive.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Contact not found in the tenant's partition.
    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),

    /// Payment direction does not match the invoice type.
    #[error("A {payment:?} payment cannot settle a {invoice:?} invoice")]
    DirectionMismatch {
        /// The payment's direction.
        payment: PaymentDirection,
        /// The invoice's type.
        invoice: InvoiceType,
    },

    /// Invoice is not in a status that accepts allocations.
    #[error("Invoice in status {0:?} does not accept allocations")]
    InvoiceNotAllocatable(InvoiceStatus),

    // ========== Balance Errors ==========
    /// Allocation exceeds the payment's unallocated balance.
    #[error("Allocation of {requested} exceeds unallocated balance {unallocated}")]
    InsufficientPaymentBalance {
        /// The payment's remaining unallocated amount.
        unallocated: Decimal,
        /// Requested allocation amount.
        requested: Decimal,
    },

    // ========== State Errors ==========
    /// Payment not found in the tenant's partition.
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    // ========== Delegated / Infrastructure ==========
    /// Invoice-side failure (overpayment, missing invoice).
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

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

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ContactNotFound(_) => "CONTACT_NOT_FOUND",
            Self::DirectionMismatch { .. } => "DIRECTION_MISMATCH",
            Self::InvoiceNotAllocatable(_) => "INVOICE_NOT_ALLOCATABLE",
            Self::InsufficientPaymentBalance { .. } => "INSUFFICIENT_PAYMENT_BALANCE",
            Self::NotFound(_) => "PAYMENT_NOT_FOUND",
            Self::Invoice(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Conflict => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount | Self::DirectionMismatch { .. } => 400,

            Self::InvoiceNotAllocatable(_) | Self::InsufficientPaymentBalance { .. } => 422,

            Self::ContactNotFound(_) | Self::NotFound(_) => 404,

            Self::Invoice(e) => e.http_status_code(),
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
            Self::Invoice(e) => e.is_retryable(),
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
        assert_eq!(
            PaymentError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            PaymentError::InsufficientPaymentBalance {
                unallocated: dec!(10),
                requested: dec!(20)
            }
            .error_code(),
            "INSUFFICIENT_PAYMENT_BALANCE"
        );
        assert_eq!(
            PaymentError::DirectionMismatch {
                payment: PaymentDirection::Received,
                invoice: InvoiceType::Purchase
            }
            .error_code(),
            "DIRECTION_MISMATCH"
        );
    }

    #[test]
    fn test_invoice_errors_pass_through() {
        let err = PaymentError::Invoice(InvoiceError::Overpayment {
            amount_due: dec!(400),
            requested: dec!(500),
        });
        assert_eq!(err.error_code(), "OVERPAYMENT");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(PaymentError::NonPositiveAmount.http_status_code(), 400);
        assert_eq!(PaymentError::NotFound(Uuid::nil()).http_status_code(), 404);
        assert_eq!(
            PaymentError::InsufficientPaymentBalance {
                unallocated: dec!(1),
                requested: dec!(2)
            }
            .http_status_code(),
            422
        );
        assert_eq!(PaymentError::Conflict.http_status_code(), 409);
    }

    #[test]
    fn test_retryable() {
        assert!(PaymentError::Conflict.is_retryable());
        assert!(PaymentError::Ledger(LedgerError::Conflict).is_retryable());
        assert!(!PaymentError::NonPositiveAmount.is_retryable());
    }
}
