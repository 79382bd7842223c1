//! Account repository for chart-of-accounts operations and balance queries.

use chrono::{NaiveDate, Utc};
use kassa_core::ledger::{AccountType, LedgerError};
use kassa_shared::types::{AccountId, TenantId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{
    accounts, journal_entries, journal_lines,
    sea_orm_active_enums::{EntryStatus, SystemTag},
};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Role in automatic posting, if any.
    pub system_tag: Option<SystemTag>,
}

/// Derived balance for one account.
#[derive(Debug, Clone)]
pub struct AccountBalance {
    /// The account.
    pub account: accounts::Model,
    /// Cut-off date the balance was computed for, if any.
    pub as_of: Option<NaiveDate>,
    /// Sum of debit amounts over contributing lines.
    pub debit_total: Decimal,
    /// Sum of credit amounts over contributing lines.
    pub credit_total: Decimal,
    /// Totals normalized to the account's normal side.
    pub balance: Decimal,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccountCode` if the code is taken within the tenant.
    pub async fn create_account(
        &self,
        tenant_id: TenantId,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, LedgerError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(accounts::Column::Code.eq(input.code.clone()))
            .one(&self.db)
            .await
            .map_err(map_db)?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateAccountCode(input.code));
        }

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            system_tag: Set(input.system_tag),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        account.insert(&self.db).await.map_err(map_db)
    }

    /// Lists the tenant's accounts, ordered by code.
    pub async fn list_accounts(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<accounts::Model>, LedgerError> {
        accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(map_db)
    }

    /// Gets an account by id within the tenant.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if missing from the tenant's partition.
    pub async fn get_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<accounts::Model, LedgerError> {
        accounts::Entity::find_by_id(account_id.into_inner())
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?
            .ok_or(LedgerError::AccountNotFound(account_id.into_inner()))
    }

    /// Derives the account's balance by summing journal lines.
    ///
    /// Lines of posted and voided entries both contribute: a voided entry is
    /// netted by its posted reversal, and as-of queries dated before the
    /// reversal must still see the original. Draft entries never contribute.
    pub async fn account_balance(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<AccountBalance, LedgerError> {
        let account = self.get_account(tenant_id, account_id).await?;

        let mut query = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .inner_join(journal_entries::Entity)
            .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(journal_entries::Column::Status.ne(EntryStatus::Draft));

        if let Some(cutoff) = as_of {
            query = query.filter(journal_entries::Column::EntryDate.lte(cutoff));
        }

        let lines = query.all(&self.db).await.map_err(map_db)?;

        let debit_total: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit_total: Decimal = lines.iter().map(|l| l.credit).sum();
        let account_type: AccountType = account.account_type.clone().into();
        let balance = account_type
            .normal_side()
            .signed_balance(debit_total, credit_total);

        Ok(AccountBalance {
            account,
            as_of,
            debit_total,
            credit_total,
            balance,
        })
    }
}

pub(crate) fn map_db(err: DbErr) -> LedgerError {
    if super::is_lock_conflict(&err) {
        LedgerError::Conflict
    } else {
        LedgerError::Database(err.to_string())
    }
}
