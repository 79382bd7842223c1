//! Overdue-interest accrual.
//!
//! Simple (non-compounding) daily interest on an invoice's outstanding
//! balance, computed from the day after the due date.

pub mod calc;
pub mod error;

pub use calc::{InterestCalculator, InterestOutcome};
pub use error::InterestError;
