//! Chart-of-accounts routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use kassa_core::ledger::AccountType;
use kassa_db::entities::{accounts, sea_orm_active_enums::SystemTag};
use kassa_db::repositories::{AccountRepository, CreateAccountInput};
use kassa_shared::types::{AccountId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::ApiError;
use crate::AppState;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account).get(list_accounts))
        .route("/accounts/{account_id}/balance", get(account_balance))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Role in automatic posting, if any.
    pub system_tag: Option<SystemTag>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Role in automatic posting, if any.
    pub system_tag: Option<SystemTag>,
    /// Whether the account accepts postings.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            account_type: model.account_type.into(),
            system_tag: model.system_tag,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the balance endpoint.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Cut-off date (YYYY-MM-DD); defaults to all history.
    pub as_of: Option<NaiveDate>,
}

/// Response for a derived account balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Account ID.
    pub account_id: Uuid,
    /// Cut-off date, if one was given.
    pub as_of: Option<NaiveDate>,
    /// Sum of debit amounts.
    pub debit_total: Decimal,
    /// Sum of credit amounts.
    pub credit_total: Decimal,
    /// Balance normalized to the account's normal side.
    pub balance: Decimal,
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.code.trim().is_empty() {
        return Err(ApiError::validation("Account code is required"));
    }

    let repo = AccountRepository::new(state.conn());
    let account = repo
        .create_account(
            TenantId::from_uuid(tenant_id),
            CreateAccountInput {
                code: payload.code,
                name: payload.name,
                account_type: payload.account_type,
                system_tag: payload.system_tag,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// GET `/accounts` - List the tenant's accounts.
async fn list_accounts(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new(state.conn());
    let accounts = repo.list_accounts(TenantId::from_uuid(tenant_id)).await?;

    let items: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// GET `/accounts/{account_id}/balance` - Derived balance, optionally as of a date.
async fn account_balance(
    State(state): State<AppState>,
    Path((tenant_id, account_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<BalanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new(state.conn());
    let balance = repo
        .account_balance(
            TenantId::from_uuid(tenant_id),
            AccountId::from_uuid(account_id),
            query.as_of,
        )
        .await?;

    Ok(Json(BalanceResponse {
        account_id: balance.account.id,
        as_of: balance.as_of,
        debit_total: balance.debit_total,
        credit_total: balance.credit_total,
        balance: balance.balance,
    }))
}
