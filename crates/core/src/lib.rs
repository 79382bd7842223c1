//! Core business logic for Kassa.
//!
//! Pure domain logic for the accounting core:
//! - Double-entry ledger (journal entries, balance rules, validation)
//! - Invoice lifecycle (totals, status state machine)
//! - Payment allocation (non-overdraw policy)
//! - Overdue-interest accrual
//!
//! This crate has no web or database dependencies. Persistence and transport
//! live in `kassa-db` and `kassa-api`.

pub mod interest;
pub mod invoice;
pub mod ledger;
pub mod payment;
