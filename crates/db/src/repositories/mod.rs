//! Repository abstractions for data access.
//!
//! Every repository filters by tenant id on every query; cross-tenant
//! references surface as not-found errors. Multi-row mutations run inside a
//! database transaction with `SELECT ... FOR UPDATE` locks on the rows being
//! checked-then-acted on.

pub mod account;
pub mod contact;
pub mod interest;
pub mod invoice;
pub mod ledger;
pub mod payment;

pub use account::{AccountBalance, AccountRepository, CreateAccountInput};
pub use contact::{ContactRepository, CreateContactInput};
pub use interest::{BatchInterestOutcome, InterestRepository};
pub use invoice::{
    CreateInvoiceInput, InvoiceFilter, InvoiceRepository, InvoiceWithLines,
};
pub use ledger::{EntryFilter, EntryWithLines, LedgerRepository};
pub use payment::{
    AllocationOutcome, CreatePaymentInput, PaymentFilter, PaymentRepository,
    PaymentWithAllocations,
};

use sea_orm::{DbErr, RuntimeErr};

/// Returns true if the database error indicates a lock or serialization
/// conflict that the caller may retry.
///
/// Checks the SQLSTATE first (40001 serialization_failure, 40P01
/// deadlock_detected, 55P03 lock_not_available); errors that do not carry a
/// code fall back to message matching.
pub(crate) fn is_lock_conflict(err: &DbErr) -> bool {
    if let Some(code) = sqlstate(err) {
        return matches!(code.as_str(), "40001" | "40P01" | "55P03");
    }

    let msg = err.to_string();
    msg.contains("could not serialize access")
        || msg.contains("deadlock detected")
        || msg.contains("lock not available")
        || msg.contains("lock timeout")
}

/// Extracts the SQLSTATE code from a driver-level error, if present.
fn sqlstate(err: &DbErr) -> Option<String> {
    let sqlx_err = match err {
        DbErr::Conn(RuntimeErr::SqlxError(e))
        | DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Query(RuntimeErr::SqlxError(e)) => e,
        _ => return None,
    };

    match sqlx_err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::is_lock_conflict;
    use sea_orm::DbErr;

    #[test]
    fn test_message_fallback_detects_lock_conflicts() {
        assert!(is_lock_conflict(&DbErr::Custom(
            "deadlock detected".to_string()
        )));
        assert!(is_lock_conflict(&DbErr::Custom(
            "could not serialize access due to concurrent update".to_string()
        )));
        assert!(is_lock_conflict(&DbErr::Custom(
            "canceling statement due to lock timeout".to_string()
        )));
    }

    #[test]
    fn test_non_conflict_errors_are_not_retryable() {
        assert!(!is_lock_conflict(&DbErr::Custom(
            "duplicate key value violates unique constraint".to_string()
        )));
        assert!(!is_lock_conflict(&DbErr::Custom(
            "connection refused".to_string()
        )));
    }
}
