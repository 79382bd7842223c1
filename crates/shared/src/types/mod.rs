//! Shared domain-neutral types.

pub mod id;
pub mod rounding;

pub use id::{
    AccountId, AllocationId, ContactId, InvoiceId, InvoiceLineId, JournalEntryId, JournalLineId,
    PaymentId, TenantId, UserId,
};
pub use rounding::{round_currency, CURRENCY_SCALE};
