//! Invoice lifecycle logic.
//!
//! - Invoice and line domain types
//! - Totals computed from lines (half-up rounding at the line level)
//! - Status state machine (draft → sent → partially_paid/paid, void)
//! - Allocation application and overpayment protection

pub mod error;
pub mod lifecycle;
pub mod totals;
pub mod types;

#[cfg(test)]
mod totals_props;

pub use error::InvoiceError;
pub use lifecycle::{apply_allocation, check_sendable, check_voidable, status_for_amount_paid};
pub use totals::{InvoiceTotals, LineTotals};
pub use types::{InvoiceLineInput, InvoiceStatus, InvoiceType};
