//! Interest error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during interest calculation.
#[derive(Debug, Error)]
pub enum InterestError {
    /// Daily rate cannot be negative.
    #[error("Daily interest rate cannot be negative")]
    NegativeRate,

    /// Invoice not found in the tenant's partition.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl InterestError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeRate => "NEGATIVE_RATE",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeRate => 400,
            Self::InvoiceNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_statuses() {
        assert_eq!(InterestError::NegativeRate.error_code(), "NEGATIVE_RATE");
        assert_eq!(InterestError::NegativeRate.http_status_code(), 400);
        assert_eq!(
            InterestError::InvoiceNotFound(Uuid::nil()).http_status_code(),
            404
        );
    }
}
