//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries and lines (debits and credits)
//! - Balance calculation rules per account type
//! - Entry validation (balance invariant, line shape)
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{AccountType, NormalSide};
pub use entry::{EntryStatus, JournalEntry, JournalLine};
pub use error::LedgerError;
pub use service::{EntryTotals, LedgerService};
pub use types::{JournalLineInput, PostEntryInput, ValidatedEntry, ValidatedLine};
