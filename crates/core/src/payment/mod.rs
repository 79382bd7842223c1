//! Payment allocation logic.
//!
//! Payments are created with a fixed amount and allocated across invoices
//! over their lifetime. The policy here guarantees an allocation never
//! overdraws the payment's unallocated balance or the invoice's amount due,
//! and that payment direction matches invoice type.

pub mod error;
pub mod policy;
pub mod types;

#[cfg(test)]
mod policy_props;

pub use error::PaymentError;
pub use policy::{AllocationCheck, AllocationPolicy};
pub use types::PaymentDirection;
