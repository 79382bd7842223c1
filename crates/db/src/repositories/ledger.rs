//! Ledger repository for journal entry database operations.
//!
//! Posted entries are immutable. The only correction mechanism is
//! `reverse_entry`, which posts a debit/credit-swapped entry and marks the
//! original void, atomically under a row lock.

use chrono::{NaiveDate, Utc};
use kassa_core::ledger::{
    EntryStatus as CoreEntryStatus, LedgerError, LedgerService, PostEntryInput, ValidatedEntry,
    ValidatedLine,
};
use kassa_shared::types::{JournalEntryId, JournalLineId, TenantId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::account::map_db;
use crate::entities::{
    accounts, journal_entries, journal_lines,
    sea_orm_active_enums::{EntryStatus, SystemTag},
};

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<CoreEntryStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Journal entry with its lines.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// The entry's lines.
    pub lines: Vec<journal_lines::Model>,
}

/// Ledger repository for journal entry operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and posts a journal entry.
    ///
    /// Validation runs in the pure core first; nothing persists unless the
    /// entry balances and every referenced account exists in the tenant and
    /// is active.
    pub async fn post_entry(
        &self,
        tenant_id: TenantId,
        input: PostEntryInput,
        created_by: UserId,
    ) -> Result<EntryWithLines, LedgerError> {
        let validated = LedgerService::validate(&input)?;

        let txn = self.db.begin().await.map_err(map_db)?;
        let posted = post_validated(&txn, tenant_id, &validated, created_by, None).await?;
        txn.commit().await.map_err(map_db)?;

        Ok(posted)
    }

    /// Reverses a posted entry.
    ///
    /// Posts a new entry dated `reversal_date` whose lines are the original's
    /// with debit and credit swapped, marks the original void, and links the
    /// two. Returns the reversing entry.
    pub async fn reverse_entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
        actor: UserId,
        reversal_date: NaiveDate,
    ) -> Result<EntryWithLines, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db)?;
        let reversal =
            reverse_entry_in_txn(&txn, tenant_id, entry_id.into_inner(), actor, reversal_date)
                .await?;
        txn.commit().await.map_err(map_db)?;

        Ok(reversal)
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if missing from the tenant's partition.
    pub async fn get_entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<EntryWithLines, LedgerError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?
            .ok_or(LedgerError::EntryNotFound(entry_id.into_inner()))?;

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(entry.id))
            .all(&self.db)
            .await
            .map_err(map_db)?;

        Ok(EntryWithLines { entry, lines })
    }

    /// Lists entry headers with optional filters, newest first.
    pub async fn list_entries(
        &self,
        tenant_id: TenantId,
        filter: EntryFilter,
    ) -> Result<Vec<journal_entries::Model>, LedgerError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()));

        if let Some(status) = filter.status {
            let status: EntryStatus = status.into();
            query = query.filter(journal_entries::Column::Status.eq(status));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db)
    }
}

/// Persists a validated entry and its lines with status `posted`.
///
/// Shared by direct posting, entry reversal, and the invoice/payment
/// repositories, which post recognition and cash-movement entries inside
/// their own transactions.
pub(crate) async fn post_validated<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    entry: &ValidatedEntry,
    created_by: UserId,
    reversal_of: Option<Uuid>,
) -> Result<EntryWithLines, LedgerError> {
    check_accounts(conn, tenant_id, &entry.lines).await?;

    let now = Utc::now().into();
    let entry_model = journal_entries::ActiveModel {
        id: Set(JournalEntryId::new().into_inner()),
        tenant_id: Set(tenant_id.into_inner()),
        entry_date: Set(entry.entry_date),
        memo: Set(entry.memo.clone()),
        status: Set(EntryStatus::Posted),
        reversal_of: Set(reversal_of),
        reversed_by: Set(None),
        created_by: Set(created_by.into_inner()),
        created_at: Set(now),
    };
    let inserted = entry_model.insert(conn).await.map_err(map_db)?;

    let mut lines = Vec::with_capacity(entry.lines.len());
    for line in &entry.lines {
        let line_model = journal_lines::ActiveModel {
            id: Set(JournalLineId::new().into_inner()),
            entry_id: Set(inserted.id),
            account_id: Set(line.account_id.into_inner()),
            debit: Set(line.debit),
            credit: Set(line.credit),
            memo: Set(line.memo.clone()),
        };
        lines.push(line_model.insert(conn).await.map_err(map_db)?);
    }

    Ok(EntryWithLines {
        entry: inserted,
        lines,
    })
}

/// Reverses an entry inside an existing transaction.
///
/// Locks the original row, verifies it is still reversible, posts the
/// swapped entry, and sets the original's status and `reversed_by` pointer.
pub(crate) async fn reverse_entry_in_txn(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    entry_id: Uuid,
    actor: UserId,
    reversal_date: NaiveDate,
) -> Result<EntryWithLines, LedgerError> {
    let original = journal_entries::Entity::find_by_id(entry_id)
        .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(map_db)?
        .ok_or(LedgerError::EntryNotFound(entry_id))?;

    let status: CoreEntryStatus = original.status.clone().into();
    if !status.can_reverse() || original.reversed_by.is_some() {
        return Err(LedgerError::AlreadyVoided(entry_id));
    }

    let original_lines = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .all(txn)
        .await
        .map_err(map_db)?;

    let swapped: Vec<ValidatedLine> = original_lines
        .iter()
        .map(|l| ValidatedLine {
            account_id: kassa_shared::types::AccountId::from_uuid(l.account_id),
            debit: l.credit,
            credit: l.debit,
            memo: l.memo.clone(),
        })
        .collect();
    let total = swapped.iter().map(|l| l.debit).sum();

    let reversal_entry = ValidatedEntry {
        entry_date: reversal_date,
        memo: Some(format!("Reversal of journal entry {entry_id}")),
        lines: swapped,
        total,
    };
    let reversal =
        post_validated(txn, tenant_id, &reversal_entry, actor, Some(entry_id)).await?;

    let mut voided: journal_entries::ActiveModel = original.into();
    voided.status = Set(EntryStatus::Void);
    voided.reversed_by = Set(Some(reversal.entry.id));
    voided.update(txn).await.map_err(map_db)?;

    Ok(reversal)
}

/// Builds and posts a balanced entry from raw input inside a transaction.
pub(crate) async fn post_input<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    input: &PostEntryInput,
    created_by: UserId,
) -> Result<EntryWithLines, LedgerError> {
    let validated = LedgerService::validate(input)?;
    post_validated(conn, tenant_id, &validated, created_by, None).await
}

/// Finds the tenant's active account carrying the given system tag.
pub(crate) async fn find_system_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    tag: SystemTag,
) -> Result<accounts::Model, LedgerError> {
    accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(accounts::Column::SystemTag.eq(tag.clone()))
        .filter(accounts::Column::IsActive.eq(true))
        .one(conn)
        .await
        .map_err(map_db)?
        .ok_or_else(|| LedgerError::SystemAccountMissing(tag.as_str().to_string()))
}

/// Verifies that every referenced account exists in the tenant and is active.
async fn check_accounts<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    lines: &[ValidatedLine],
) -> Result<(), LedgerError> {
    let mut ids: Vec<Uuid> = lines.iter().map(|l| l.account_id.into_inner()).collect();
    ids.sort_unstable();
    ids.dedup();

    let found = accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(accounts::Column::Id.is_in(ids.clone()))
        .all(conn)
        .await
        .map_err(map_db)?;

    for id in ids {
        let account = found
            .iter()
            .find(|a| a.id == id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(id));
        }
    }

    Ok(())
}
