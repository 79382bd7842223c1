//! Payment repository for payment and allocation database operations.
//!
//! `allocate` is the concurrency hot spot: it locks the payment and the
//! invoice rows exclusively, validates against the locked snapshot in the
//! pure core, and commits the allocation row, the cash-movement entry, and
//! the invoice update atomically.

use chrono::{NaiveDate, Utc};
use kassa_core::ledger::{JournalLineInput, PostEntryInput};
use kassa_core::payment::{
    AllocationCheck, AllocationPolicy, PaymentDirection as CorePaymentDirection, PaymentError,
};
use kassa_shared::types::{AccountId, AllocationId, ContactId, InvoiceId, PaymentId, TenantId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

use super::{invoice, ledger};
use crate::entities::{
    allocations, contacts, invoices, payments,
    sea_orm_active_enums::{PaymentDirection, SystemTag},
};

/// Input for creating a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Received or made.
    pub direction: CorePaymentDirection,
    /// Counterparty.
    pub contact_id: ContactId,
    /// Payment amount (must be positive, fixed at creation).
    pub amount: Decimal,
    /// Date of the payment.
    pub payment_date: NaiveDate,
}

/// Filter options for listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    /// Filter by direction.
    pub direction: Option<CorePaymentDirection>,
    /// Filter by contact.
    pub contact_id: Option<ContactId>,
    /// Filter by payment date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by payment date range end.
    pub date_to: Option<NaiveDate>,
}

/// Payment with its allocations and derived unallocated balance.
#[derive(Debug, Clone)]
pub struct PaymentWithAllocations {
    /// Payment header.
    pub payment: payments::Model,
    /// Allocations applied so far.
    pub allocations: Vec<allocations::Model>,
    /// amount minus the sum of allocations.
    pub amount_unallocated: Decimal,
}

/// Result of a successful allocation.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// The inserted allocation row.
    pub allocation: allocations::Model,
    /// The invoice after the allocation was applied.
    pub invoice: invoices::Model,
    /// The cash-movement entry posted for the allocation.
    pub entry: ledger::EntryWithLines,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a payment with no allocations.
    pub async fn create_payment(
        &self,
        tenant_id: TenantId,
        input: CreatePaymentInput,
        created_by: UserId,
    ) -> Result<payments::Model, PaymentError> {
        if input.amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }

        let contact = contacts::Entity::find_by_id(input.contact_id.into_inner())
            .filter(contacts::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?;
        if contact.is_none() {
            return Err(PaymentError::ContactNotFound(input.contact_id.into_inner()));
        }

        let now = Utc::now().into();
        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            direction: Set(input.direction.into()),
            contact_id: Set(input.contact_id.into_inner()),
            amount: Set(input.amount),
            payment_date: Set(input.payment_date),
            created_by: Set(created_by.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        payment.insert(&self.db).await.map_err(map_db)
    }

    /// Allocates part of a payment to an invoice.
    ///
    /// One transaction: lock payment and invoice, validate the snapshot,
    /// insert the allocation, post the cash entry (received: debit cash,
    /// credit receivable; made: debit payable, credit cash), and raise the
    /// invoice's paid amount. All three effects commit together.
    pub async fn allocate(
        &self,
        tenant_id: TenantId,
        payment_id: PaymentId,
        invoice_id: InvoiceId,
        amount: Decimal,
        actor: UserId,
    ) -> Result<AllocationOutcome, PaymentError> {
        let txn = self.db.begin().await.map_err(map_db)?;

        let payment = payments::Entity::find_by_id(payment_id.into_inner())
            .filter(payments::Column::TenantId.eq(tenant_id.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db)?
            .ok_or(PaymentError::NotFound(payment_id.into_inner()))?;

        let invoice = invoice::lock_invoice(&txn, tenant_id, invoice_id).await?;

        let allocated = allocated_total(
            allocations::Entity::find()
                .filter(allocations::Column::PaymentId.eq(payment.id))
                .all(&txn)
                .await
                .map_err(map_db)?
                .iter(),
        );

        AllocationPolicy::check(AllocationCheck {
            amount,
            payment_direction: payment.direction.clone().into(),
            payment_unallocated: payment.amount - allocated,
            invoice_type: invoice.invoice_type.clone().into(),
            invoice_status: invoice.status.clone().into(),
            invoice_amount_due: invoice.amount_due(),
        })?;

        let entry_input = cash_entry(
            &txn,
            tenant_id,
            payment.direction.clone().into(),
            amount,
            payment.payment_date,
            &invoice.number,
        )
        .await?;
        let entry = ledger::post_input(&txn, tenant_id, &entry_input, actor).await?;

        let allocation = allocations::ActiveModel {
            id: Set(AllocationId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            payment_id: Set(payment.id),
            invoice_id: Set(invoice.id),
            amount: Set(amount),
            journal_entry_id: Set(entry.entry.id),
            created_at: Set(Utc::now().into()),
        };
        let allocation = allocation.insert(&txn).await.map_err(map_db)?;

        let invoice = invoice::record_allocation(&txn, invoice, amount).await?;

        txn.commit().await.map_err(map_db)?;

        Ok(AllocationOutcome {
            allocation,
            invoice,
            entry,
        })
    }

    /// Gets a payment with its allocations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if missing from the tenant's partition.
    pub async fn get_payment(
        &self,
        tenant_id: TenantId,
        payment_id: PaymentId,
    ) -> Result<PaymentWithAllocations, PaymentError> {
        let payment = payments::Entity::find_by_id(payment_id.into_inner())
            .filter(payments::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?
            .ok_or(PaymentError::NotFound(payment_id.into_inner()))?;

        let allocations = allocations::Entity::find()
            .filter(allocations::Column::PaymentId.eq(payment.id))
            .order_by_asc(allocations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db)?;

        let amount_unallocated = payment.amount - allocated_total(allocations.iter());

        Ok(PaymentWithAllocations {
            payment,
            allocations,
            amount_unallocated,
        })
    }

    /// Lists payment headers with optional filters, newest first.
    pub async fn list_payments(
        &self,
        tenant_id: TenantId,
        filter: PaymentFilter,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        let mut query = payments::Entity::find()
            .filter(payments::Column::TenantId.eq(tenant_id.into_inner()));

        if let Some(direction) = filter.direction {
            let direction: PaymentDirection = direction.into();
            query = query.filter(payments::Column::Direction.eq(direction));
        }
        if let Some(contact_id) = filter.contact_id {
            query = query.filter(payments::Column::ContactId.eq(contact_id.into_inner()));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(payments::Column::PaymentDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(payments::Column::PaymentDate.lte(to));
        }

        query
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db)
    }

    /// Payments with a positive unallocated balance, oldest first.
    ///
    /// Ordering is a FIFO hint for the allocation UI; nothing allocates
    /// automatically.
    pub async fn unallocated_payments(
        &self,
        tenant_id: TenantId,
        direction: Option<CorePaymentDirection>,
    ) -> Result<Vec<PaymentWithAllocations>, PaymentError> {
        let mut query = payments::Entity::find()
            .filter(payments::Column::TenantId.eq(tenant_id.into_inner()));
        if let Some(direction) = direction {
            let direction: PaymentDirection = direction.into();
            query = query.filter(payments::Column::Direction.eq(direction));
        }
        let payments = query
            .order_by_asc(payments::Column::PaymentDate)
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db)?;

        let all_allocations = allocations::Entity::find()
            .filter(allocations::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(allocations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db)?;

        let mut by_payment: HashMap<uuid::Uuid, Vec<allocations::Model>> = HashMap::new();
        for allocation in all_allocations {
            by_payment
                .entry(allocation.payment_id)
                .or_default()
                .push(allocation);
        }

        let mut result = Vec::new();
        for payment in payments {
            let allocations = by_payment.remove(&payment.id).unwrap_or_default();
            let amount_unallocated = payment.amount - allocated_total(allocations.iter());
            if amount_unallocated > Decimal::ZERO {
                result.push(PaymentWithAllocations {
                    payment,
                    allocations,
                    amount_unallocated,
                });
            }
        }

        Ok(result)
    }
}

fn allocated_total<'a, I: Iterator<Item = &'a allocations::Model>>(allocations: I) -> Decimal {
    allocations.map(|a| a.amount).sum()
}

/// Builds the cash-movement entry for an allocation.
async fn cash_entry(
    txn: &sea_orm::DatabaseTransaction,
    tenant_id: TenantId,
    direction: CorePaymentDirection,
    amount: Decimal,
    entry_date: NaiveDate,
    invoice_number: &str,
) -> Result<PostEntryInput, PaymentError> {
    let cash = ledger::find_system_account(txn, tenant_id, SystemTag::Cash).await?;

    let lines = match direction {
        CorePaymentDirection::Received => {
            let receivable =
                ledger::find_system_account(txn, tenant_id, SystemTag::AccountsReceivable)
                    .await?;
            vec![
                JournalLineInput::debit(AccountId::from_uuid(cash.id), amount),
                JournalLineInput::credit(AccountId::from_uuid(receivable.id), amount),
            ]
        }
        CorePaymentDirection::Made => {
            let payable =
                ledger::find_system_account(txn, tenant_id, SystemTag::AccountsPayable).await?;
            vec![
                JournalLineInput::debit(AccountId::from_uuid(payable.id), amount),
                JournalLineInput::credit(AccountId::from_uuid(cash.id), amount),
            ]
        }
    };

    Ok(PostEntryInput {
        entry_date,
        memo: Some(format!("Payment allocated to invoice {invoice_number}")),
        lines,
    })
}

fn map_db(err: DbErr) -> PaymentError {
    if super::is_lock_conflict(&err) {
        PaymentError::Conflict
    } else {
        PaymentError::Database(err.to_string())
    }
}
