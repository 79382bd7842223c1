//! Interest repository for overdue-interest accrual runs.
//!
//! Calculation is pure; this repository only snapshots the invoice, runs the
//! calculator, and appends to the history log. Interest never touches the
//! ledger or the invoice itself.

use chrono::{NaiveDate, Utc};
use kassa_core::interest::{InterestCalculator, InterestError, InterestOutcome};
use kassa_shared::types::{InvoiceId, TenantId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{
    invoice_interest, invoices,
    sea_orm_active_enums::InvoiceStatus,
};

/// Result of a batch interest run.
///
/// Per-invoice failures are collected instead of aborting the run.
#[derive(Debug, Default)]
pub struct BatchInterestOutcome {
    /// Outcomes for invoices that were processed.
    pub processed: Vec<(Uuid, InterestOutcome)>,
    /// Invoices that failed, with the failure message.
    pub failures: Vec<(Uuid, String)>,
}

/// Interest repository.
#[derive(Debug, Clone)]
pub struct InterestRepository {
    db: DatabaseConnection,
}

impl InterestRepository {
    /// Creates a new interest repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Calculates accrued interest for one invoice.
    ///
    /// Returns a zero outcome without writing history when the invoice is
    /// paid or void, or when `as_of` is on or before the due date. Otherwise
    /// appends one history row per call; same-day reruns append again.
    pub async fn calculate(
        &self,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
        daily_rate: Decimal,
        as_of: NaiveDate,
    ) -> Result<InterestOutcome, InterestError> {
        let invoice = invoices::Entity::find_by_id(invoice_id.into_inner())
            .filter(invoices::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?
            .ok_or(InterestError::InvoiceNotFound(invoice_id.into_inner()))?;

        let outcome = InterestCalculator::calculate(
            invoice.status.clone().into(),
            invoice.due_date,
            invoice.amount_due(),
            daily_rate,
            as_of,
        )?;

        if outcome.days_overdue > 0 {
            let row = invoice_interest::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(tenant_id.into_inner()),
                invoice_id: Set(invoice.id),
                calculated_on: Set(as_of),
                principal: Set(outcome.principal),
                days_overdue: Set(outcome.days_overdue),
                daily_rate: Set(outcome.daily_rate),
                interest: Set(outcome.interest),
                created_at: Set(Utc::now().into()),
            };
            row.insert(&self.db).await.map_err(map_db)?;
        }

        Ok(outcome)
    }

    /// Runs interest calculation over every overdue open invoice.
    ///
    /// Overdue means status sent or partially paid with a due date before
    /// `as_of`. A failure on one invoice is recorded and the run continues.
    pub async fn calculate_overdue(
        &self,
        tenant_id: TenantId,
        daily_rate: Decimal,
        as_of: NaiveDate,
    ) -> Result<BatchInterestOutcome, InterestError> {
        let overdue = invoices::Entity::find()
            .filter(invoices::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(
                invoices::Column::Status
                    .is_in([InvoiceStatus::Sent, InvoiceStatus::PartiallyPaid]),
            )
            .filter(invoices::Column::DueDate.lt(as_of))
            .order_by_asc(invoices::Column::DueDate)
            .all(&self.db)
            .await
            .map_err(map_db)?;

        let mut batch = BatchInterestOutcome::default();
        for invoice in overdue {
            let invoice_id = InvoiceId::from_uuid(invoice.id);
            match self
                .calculate(tenant_id, invoice_id, daily_rate, as_of)
                .await
            {
                Ok(outcome) => batch.processed.push((invoice.id, outcome)),
                Err(err) => {
                    tracing::warn!(
                        invoice_id = %invoice.id,
                        error = %err,
                        "interest calculation failed, continuing batch"
                    );
                    batch.failures.push((invoice.id, err.to_string()));
                }
            }
        }

        Ok(batch)
    }

    /// The append-only interest history for an invoice, newest first.
    pub async fn interest_history(
        &self,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
    ) -> Result<Vec<invoice_interest::Model>, InterestError> {
        let invoice = invoices::Entity::find_by_id(invoice_id.into_inner())
            .filter(invoices::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?;
        if invoice.is_none() {
            return Err(InterestError::InvoiceNotFound(invoice_id.into_inner()));
        }

        invoice_interest::Entity::find()
            .filter(invoice_interest::Column::InvoiceId.eq(invoice_id.into_inner()))
            .order_by_desc(invoice_interest::Column::CalculatedOn)
            .order_by_desc(invoice_interest::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db)
    }
}

fn map_db(err: DbErr) -> InterestError {
    InterestError::Database(err.to_string())
}
