//! Invoice repository for invoice lifecycle database operations.
//!
//! Numbers come from a per-tenant, per-type sequence locked exclusively at
//! assignment; a number is consumed once and never reused, even when the
//! invoice is later voided.

use chrono::{NaiveDate, Utc};
use kassa_core::invoice::{
    lifecycle, InvoiceError, InvoiceLineInput, InvoiceStatus as CoreInvoiceStatus,
    InvoiceTotals, InvoiceType as CoreInvoiceType,
};
use kassa_core::ledger::{JournalLineInput, PostEntryInput};
use kassa_shared::types::{ContactId, InvoiceId, InvoiceLineId, TenantId, UserId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use super::ledger;
use crate::entities::{
    contacts, invoice_lines, invoice_sequences, invoices,
    sea_orm_active_enums::{InvoiceStatus, InvoiceType, SystemTag},
};

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Sales or purchase.
    pub invoice_type: CoreInvoiceType,
    /// Counterparty.
    pub contact_id: ContactId,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Invoice lines (at least one).
    pub lines: Vec<InvoiceLineInput>,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by invoice type.
    pub invoice_type: Option<CoreInvoiceType>,
    /// Filter by status.
    pub status: Option<CoreInvoiceStatus>,
    /// Filter by contact.
    pub contact_id: Option<ContactId>,
    /// Filter by issue date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by issue date range end.
    pub date_to: Option<NaiveDate>,
    /// Text search on invoice number and line descriptions.
    pub search: Option<String>,
}

/// Invoice with its lines.
#[derive(Debug, Clone)]
pub struct InvoiceWithLines {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Lines ordered by position.
    pub lines: Vec<invoice_lines::Model>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft invoice.
    ///
    /// Totals are computed in the pure core (rounded half-up per line, then
    /// summed); the number is assigned from the tenant+type sequence under an
    /// exclusive row lock.
    pub async fn create_invoice(
        &self,
        tenant_id: TenantId,
        input: CreateInvoiceInput,
        created_by: UserId,
    ) -> Result<InvoiceWithLines, InvoiceError> {
        let (line_totals, totals) = InvoiceTotals::from_lines(&input.lines)?;

        let txn = self.db.begin().await.map_err(map_db)?;

        let contact = contacts::Entity::find_by_id(input.contact_id.into_inner())
            .filter(contacts::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&txn)
            .await
            .map_err(map_db)?;
        if contact.is_none() {
            return Err(InvoiceError::ContactNotFound(input.contact_id.into_inner()));
        }

        let number = next_number(&txn, tenant_id, input.invoice_type).await?;

        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            invoice_type: Set(input.invoice_type.into()),
            number: Set(number),
            contact_id: Set(input.contact_id.into_inner()),
            issue_date: Set(input.issue_date),
            due_date: Set(input.due_date),
            status: Set(InvoiceStatus::Draft),
            subtotal: Set(totals.subtotal),
            tax: Set(totals.tax),
            total: Set(totals.total),
            amount_paid: Set(Decimal::ZERO),
            journal_entry_id: Set(None),
            created_by: Set(created_by.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let invoice = invoice.insert(&txn).await.map_err(map_db)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for (position, (line, computed)) in
            input.lines.iter().zip(line_totals.iter()).enumerate()
        {
            let position = i32::try_from(position).unwrap_or(i32::MAX);
            let line_model = invoice_lines::ActiveModel {
                id: Set(InvoiceLineId::new().into_inner()),
                invoice_id: Set(invoice.id),
                position: Set(position),
                description: Set(line.description.clone()),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                tax_rate: Set(line.tax_rate),
                line_subtotal: Set(computed.subtotal),
                line_tax: Set(computed.tax),
            };
            lines.push(line_model.insert(&txn).await.map_err(map_db)?);
        }

        txn.commit().await.map_err(map_db)?;

        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Sends a draft invoice, posting its recognition entry.
    ///
    /// Sales: debit receivable for the total, credit revenue for the
    /// subtotal, credit tax payable for the tax. Purchase is the mirror.
    /// The status change and the posting commit together; on failure the
    /// invoice stays draft.
    pub async fn send_invoice(
        &self,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
        actor: UserId,
    ) -> Result<invoices::Model, InvoiceError> {
        let txn = self.db.begin().await.map_err(map_db)?;

        let invoice = lock_invoice(&txn, tenant_id, invoice_id).await?;
        lifecycle::check_sendable(invoice.status.clone().into())?;

        let entry_input = recognition_entry(&txn, tenant_id, &invoice).await?;
        let posted = ledger::post_input(&txn, tenant_id, &entry_input, actor).await?;

        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(InvoiceStatus::Sent);
        active.journal_entry_id = Set(Some(posted.entry.id));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(map_db)?;

        txn.commit().await.map_err(map_db)?;

        Ok(updated)
    }

    /// Voids an invoice.
    ///
    /// Rejected from paid and void. From sent or partially paid the
    /// recognition entry is reversed in the same transaction; existing
    /// allocations and their cash entries stand.
    pub async fn void_invoice(
        &self,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
        actor: UserId,
    ) -> Result<invoices::Model, InvoiceError> {
        let txn = self.db.begin().await.map_err(map_db)?;

        let invoice = lock_invoice(&txn, tenant_id, invoice_id).await?;
        let status: CoreInvoiceStatus = invoice.status.clone().into();
        lifecycle::check_voidable(status)?;

        if status.has_posted_entry() {
            if let Some(entry_id) = invoice.journal_entry_id {
                ledger::reverse_entry_in_txn(
                    &txn,
                    tenant_id,
                    entry_id,
                    actor,
                    Utc::now().date_naive(),
                )
                .await?;
            }
        }

        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(InvoiceStatus::Void);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(map_db)?;

        txn.commit().await.map_err(map_db)?;

        Ok(updated)
    }

    /// Gets an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if missing from the tenant's partition.
    pub async fn get_invoice(
        &self,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
    ) -> Result<InvoiceWithLines, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(invoice_id.into_inner())
            .filter(invoices::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?
            .ok_or(InvoiceError::NotFound(invoice_id.into_inner()))?;

        let lines = invoice_lines::Entity::find()
            .filter(invoice_lines::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(invoice_lines::Column::Position)
            .all(&self.db)
            .await
            .map_err(map_db)?;

        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Lists invoice headers with optional filters, newest first.
    pub async fn list_invoices(
        &self,
        tenant_id: TenantId,
        filter: InvoiceFilter,
    ) -> Result<Vec<invoices::Model>, InvoiceError> {
        let mut query = invoices::Entity::find()
            .filter(invoices::Column::TenantId.eq(tenant_id.into_inner()));

        if let Some(invoice_type) = filter.invoice_type {
            let invoice_type: InvoiceType = invoice_type.into();
            query = query.filter(invoices::Column::InvoiceType.eq(invoice_type));
        }
        if let Some(status) = filter.status {
            let status: InvoiceStatus = status.into();
            query = query.filter(invoices::Column::Status.eq(status));
        }
        if let Some(contact_id) = filter.contact_id {
            query = query.filter(invoices::Column::ContactId.eq(contact_id.into_inner()));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(invoices::Column::IssueDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(invoices::Column::IssueDate.lte(to));
        }
        if let Some(search) = filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(invoices::Column::Number.like(pattern.clone()))
                    .add(
                        invoices::Column::Id.in_subquery(
                            Query::select()
                                .column(invoice_lines::Column::InvoiceId)
                                .from(invoice_lines::Entity)
                                .and_where(invoice_lines::Column::Description.like(pattern))
                                .to_owned(),
                        ),
                    ),
            );
        }

        query
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db)
    }
}

/// Locks an invoice row exclusively within the tenant.
pub(crate) async fn lock_invoice(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    invoice_id: InvoiceId,
) -> Result<invoices::Model, InvoiceError> {
    invoices::Entity::find_by_id(invoice_id.into_inner())
        .filter(invoices::Column::TenantId.eq(tenant_id.into_inner()))
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(map_db)?
        .ok_or(InvoiceError::NotFound(invoice_id.into_inner()))
}

/// Applies an allocation to a locked invoice row.
///
/// Called by the payment repository inside the allocation transaction. The
/// status transition logic lives in the pure core.
pub(crate) async fn record_allocation(
    txn: &DatabaseTransaction,
    invoice: invoices::Model,
    amount: Decimal,
) -> Result<invoices::Model, InvoiceError> {
    let (new_paid, new_status) = lifecycle::apply_allocation(
        invoice.status.clone().into(),
        invoice.total,
        invoice.amount_paid,
        amount,
    )?;

    let mut active: invoices::ActiveModel = invoice.into();
    active.amount_paid = Set(new_paid);
    active.status = Set(new_status.into());
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(map_db)
}

/// Assigns the next invoice number under an exclusive lock on the sequence
/// row, creating the row on first use.
async fn next_number(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    invoice_type: CoreInvoiceType,
) -> Result<String, InvoiceError> {
    let db_type: InvoiceType = invoice_type.into();

    let sequence = invoice_sequences::Entity::find_by_id((
        tenant_id.into_inner(),
        db_type.clone(),
    ))
    .lock_exclusive()
    .one(txn)
    .await
    .map_err(map_db)?;

    let number = match sequence {
        Some(row) => {
            let number = row.next_number;
            let mut active: invoice_sequences::ActiveModel = row.into();
            active.next_number = Set(number + 1);
            active.update(txn).await.map_err(map_db)?;
            number
        }
        None => {
            let row = invoice_sequences::ActiveModel {
                tenant_id: Set(tenant_id.into_inner()),
                invoice_type: Set(db_type),
                next_number: Set(2),
            };
            // two creators racing on first use hit the primary key; retryable
            row.insert(txn).await.map_err(|err| {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    InvoiceError::Conflict
                } else {
                    map_db(err)
                }
            })?;
            1
        }
    };

    Ok(format!("{}-{number:06}", invoice_type.number_prefix()))
}

/// Builds the recognition entry for a sent invoice.
async fn recognition_entry(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    invoice: &invoices::Model,
) -> Result<PostEntryInput, InvoiceError> {
    let has_tax = invoice.tax > Decimal::ZERO;
    let invoice_type: CoreInvoiceType = invoice.invoice_type.clone().into();

    let mut lines = Vec::with_capacity(3);
    match invoice_type {
        CoreInvoiceType::Sales => {
            let receivable =
                ledger::find_system_account(txn, tenant_id, SystemTag::AccountsReceivable)
                    .await?;
            let revenue =
                ledger::find_system_account(txn, tenant_id, SystemTag::SalesRevenue).await?;

            lines.push(JournalLineInput::debit(
                kassa_shared::types::AccountId::from_uuid(receivable.id),
                invoice.total,
            ));
            lines.push(JournalLineInput::credit(
                kassa_shared::types::AccountId::from_uuid(revenue.id),
                invoice.subtotal,
            ));
            if has_tax {
                let tax = ledger::find_system_account(txn, tenant_id, SystemTag::TaxPayable)
                    .await?;
                lines.push(JournalLineInput::credit(
                    kassa_shared::types::AccountId::from_uuid(tax.id),
                    invoice.tax,
                ));
            }
        }
        CoreInvoiceType::Purchase => {
            let payable =
                ledger::find_system_account(txn, tenant_id, SystemTag::AccountsPayable).await?;
            let expense =
                ledger::find_system_account(txn, tenant_id, SystemTag::PurchaseExpense)
                    .await?;

            lines.push(JournalLineInput::debit(
                kassa_shared::types::AccountId::from_uuid(expense.id),
                invoice.subtotal,
            ));
            if has_tax {
                let tax = ledger::find_system_account(txn, tenant_id, SystemTag::TaxPayable)
                    .await?;
                lines.push(JournalLineInput::debit(
                    kassa_shared::types::AccountId::from_uuid(tax.id),
                    invoice.tax,
                ));
            }
            lines.push(JournalLineInput::credit(
                kassa_shared::types::AccountId::from_uuid(payable.id),
                invoice.total,
            ));
        }
    }

    Ok(PostEntryInput {
        entry_date: invoice.issue_date,
        memo: Some(format!("Invoice {} sent", invoice.number)),
        lines,
    })
}

pub(crate) fn map_db(err: DbErr) -> InvoiceError {
    if super::is_lock_conflict(&err) {
        InvoiceError::Conflict
    } else {
        InvoiceError::Database(err.to_string())
    }
}
