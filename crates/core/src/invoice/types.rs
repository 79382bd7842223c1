//! Invoice domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Invoice issued to a customer (receivable).
    Sales,
    /// Invoice received from a supplier (payable).
    Purchase,
}

impl InvoiceType {
    /// Prefix used when formatting tenant-sequential invoice numbers.
    #[must_use]
    pub const fn number_prefix(self) -> &'static str {
        match self {
            Self::Sales => "INV",
            Self::Purchase => "BIL",
        }
    }
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice is being drafted; lines are still editable.
    Draft,
    /// Invoice has been dispatched; the recognition entry is posted.
    Sent,
    /// Some, but not all, of the total has been allocated.
    PartiallyPaid,
    /// The full total has been allocated.
    Paid,
    /// Invoice has been voided; terminal.
    Void,
}

impl InvoiceStatus {
    /// Returns true if allocations may be applied in this status.
    #[must_use]
    pub const fn accepts_allocations(self) -> bool {
        matches!(self, Self::Sent | Self::PartiallyPaid)
    }

    /// Returns true if a recognition entry exists for an invoice in this
    /// status (posted when the invoice was sent).
    #[must_use]
    pub const fn has_posted_entry(self) -> bool {
        matches!(self, Self::Sent | Self::PartiallyPaid | Self::Paid)
    }

    /// Returns true if the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Void)
    }
}

/// Input for a single invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineInput {
    /// Line description.
    pub description: String,
    /// Quantity (must be positive).
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Tax rate as a fraction (0.10 = 10%).
    pub tax_rate: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_prefixes() {
        assert_eq!(InvoiceType::Sales.number_prefix(), "INV");
        assert_eq!(InvoiceType::Purchase.number_prefix(), "BIL");
    }

    #[test]
    fn test_accepts_allocations() {
        assert!(InvoiceStatus::Sent.accepts_allocations());
        assert!(InvoiceStatus::PartiallyPaid.accepts_allocations());
        assert!(!InvoiceStatus::Draft.accepts_allocations());
        assert!(!InvoiceStatus::Paid.accepts_allocations());
        assert!(!InvoiceStatus::Void.accepts_allocations());
    }

    #[test]
    fn test_has_posted_entry() {
        assert!(!InvoiceStatus::Draft.has_posted_entry());
        assert!(InvoiceStatus::Sent.has_posted_entry());
        assert!(InvoiceStatus::PartiallyPaid.has_posted_entry());
        assert!(InvoiceStatus::Paid.has_posted_entry());
    }
}
