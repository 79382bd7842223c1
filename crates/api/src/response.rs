//! Error response mapping.
//!
//! Domain errors carry their own HTTP status and stable error code; this
//! module turns them into the JSON error body every endpoint shares.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kassa_core::interest::InterestError;
use kassa_core::invoice::InvoiceError;
use kassa_core::ledger::LedgerError;
use kassa_core::payment::PaymentError;
use kassa_shared::error::AppError;
use serde_json::json;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Builds an error from raw parts.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 with a validation error code.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    fn from_parts(status: u16, code: &'static str, message: String) -> Self {
        let status =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // infrastructure detail stays in the logs, not the response body
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code, %message, "internal error");
            "An internal error occurred".to_string()
        } else {
            message
        };
        Self {
            status,
            code,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<InterestError> for ApiError {
    fn from(err: InterestError) -> Self {
        Self::from_parts(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_parts(err.status_code(), err.error_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_ledger_error_mapping() {
        let err: ApiError = LedgerError::InsufficientLines.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "INSUFFICIENT_LINES");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err: ApiError = PaymentError::Conflict.into();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = InvoiceError::NotFound(Uuid::nil()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "INVOICE_NOT_FOUND");
    }

    #[test]
    fn test_database_message_is_masked() {
        let err: ApiError = LedgerError::Database("connection refused".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
    }
}
