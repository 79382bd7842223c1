//! `SeaORM` entity definitions.

pub mod accounts;
pub mod allocations;
pub mod contacts;
pub mod invoice_interest;
pub mod invoice_lines;
pub mod invoice_sequences;
pub mod invoices;
pub mod journal_entries;
pub mod journal_lines;
pub mod payments;
pub mod sea_orm_active_enums;
