//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! Each enum converts to and from its `kassa-core` counterpart so the
//! repositories can hand pure domain values across the boundary.

use kassa_core::invoice::{InvoiceStatus as CoreInvoiceStatus, InvoiceType as CoreInvoiceType};
use kassa_core::ledger::{AccountType as CoreAccountType, EntryStatus as CoreEntryStatus};
use kassa_core::payment::PaymentDirection as CorePaymentDirection;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger account classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income account.
    #[sea_orm(string_value = "income")]
    Income,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<AccountType> for CoreAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<CoreAccountType> for AccountType {
    fn from(value: CoreAccountType) -> Self {
        match value {
            CoreAccountType::Asset => Self::Asset,
            CoreAccountType::Liability => Self::Liability,
            CoreAccountType::Equity => Self::Equity,
            CoreAccountType::Income => Self::Income,
            CoreAccountType::Expense => Self::Expense,
        }
    }
}

/// Role an account plays in automatic invoice/payment posting.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "system_tag")]
#[serde(rename_all = "snake_case")]
pub enum SystemTag {
    /// Cash / bank account debited and credited by payments.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Control account for customer receivables.
    #[sea_orm(string_value = "accounts_receivable")]
    AccountsReceivable,
    /// Control account for supplier payables.
    #[sea_orm(string_value = "accounts_payable")]
    AccountsPayable,
    /// Revenue recognized when a sales invoice is sent.
    #[sea_orm(string_value = "sales_revenue")]
    SalesRevenue,
    /// Expense recognized when a purchase invoice is sent.
    #[sea_orm(string_value = "purchase_expense")]
    PurchaseExpense,
    /// Tax collected or incurred on invoice lines.
    #[sea_orm(string_value = "tax_payable")]
    TaxPayable,
}

impl SystemTag {
    /// Stable string form, used in error messages and serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::AccountsReceivable => "accounts_receivable",
            Self::AccountsPayable => "accounts_payable",
            Self::SalesRevenue => "sales_revenue",
            Self::PurchaseExpense => "purchase_expense",
            Self::TaxPayable => "tax_payable",
        }
    }
}

/// Journal entry status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry has not been committed to the ledger.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Entry is committed and authoritative.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Entry has been reversed; retained for audit.
    #[sea_orm(string_value = "void")]
    Void,
}

impl From<EntryStatus> for CoreEntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Void => Self::Void,
        }
    }
}

impl From<CoreEntryStatus> for EntryStatus {
    fn from(value: CoreEntryStatus) -> Self {
        match value {
            CoreEntryStatus::Draft => Self::Draft,
            CoreEntryStatus::Posted => Self::Posted,
            CoreEntryStatus::Void => Self::Void,
        }
    }
}

/// Invoice direction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_type")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Invoice issued to a customer.
    #[sea_orm(string_value = "sales")]
    Sales,
    /// Invoice received from a supplier.
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

impl From<InvoiceType> for CoreInvoiceType {
    fn from(value: InvoiceType) -> Self {
        match value {
            InvoiceType::Sales => Self::Sales,
            InvoiceType::Purchase => Self::Purchase,
        }
    }
}

impl From<CoreInvoiceType> for InvoiceType {
    fn from(value: CoreInvoiceType) -> Self {
        match value {
            CoreInvoiceType::Sales => Self::Sales,
            CoreInvoiceType::Purchase => Self::Purchase,
        }
    }
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice is being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Invoice has been dispatched.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Some, but not all, of the total has been allocated.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// The full total has been allocated.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Invoice has been voided.
    #[sea_orm(string_value = "void")]
    Void,
}

impl From<InvoiceStatus> for CoreInvoiceStatus {
    fn from(value: InvoiceStatus) -> Self {
        match value {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Sent => Self::Sent,
            InvoiceStatus::PartiallyPaid => Self::PartiallyPaid,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Void => Self::Void,
        }
    }
}

impl From<CoreInvoiceStatus> for InvoiceStatus {
    fn from(value: CoreInvoiceStatus) -> Self {
        match value {
            CoreInvoiceStatus::Draft => Self::Draft,
            CoreInvoiceStatus::Sent => Self::Sent,
            CoreInvoiceStatus::PartiallyPaid => Self::PartiallyPaid,
            CoreInvoiceStatus::Paid => Self::Paid,
            CoreInvoiceStatus::Void => Self::Void,
        }
    }
}

/// Direction of a payment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_direction")]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received from a customer.
    #[sea_orm(string_value = "received")]
    Received,
    /// Money paid out to a supplier.
    #[sea_orm(string_value = "made")]
    Made,
}

impl From<PaymentDirection> for CorePaymentDirection {
    fn from(value: PaymentDirection) -> Self {
        match value {
            PaymentDirection::Received => Self::Received,
            PaymentDirection::Made => Self::Made,
        }
    }
}

impl From<CorePaymentDirection> for PaymentDirection {
    fn from(value: CorePaymentDirection) -> Self {
        match value {
            CorePaymentDirection::Received => Self::Received,
            CorePaymentDirection::Made => Self::Made,
        }
    }
}

/// Contact classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contact_kind")]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// Customer (receives sales invoices).
    #[sea_orm(string_value = "customer")]
    Customer,
    /// Supplier (sends purchase invoices).
    #[sea_orm(string_value = "supplier")]
    Supplier,
    /// Acts as both customer and supplier.
    #[sea_orm(string_value = "both")]
    Both,
}
