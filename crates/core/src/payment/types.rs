//! Payment domain types.

use serde::{Deserialize, Serialize};

use crate::invoice::InvoiceType;

/// Direction of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received from a customer.
    Received,
    /// Money paid out to a supplier.
    Made,
}

impl PaymentDirection {
    /// Returns true if this payment direction can settle the invoice type.
    ///
    /// Received payments settle sales invoices; made payments settle
    /// purchase invoices.
    #[must_use]
    pub const fn settles(self, invoice_type: InvoiceType) -> bool {
        matches!(
            (self, invoice_type),
            (Self::Received, InvoiceType::Sales) | (Self::Made, InvoiceType::Purchase)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_compatibility() {
        assert!(PaymentDirection::Received.settles(InvoiceType::Sales));
        assert!(PaymentDirection::Made.settles(InvoiceType::Purchase));
        assert!(!PaymentDirection::Received.settles(InvoiceType::Purchase));
        assert!(!PaymentDirection::Made.settles(InvoiceType::Sales));
    }
}
