//! Overdue-interest routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use kassa_core::interest::InterestOutcome;
use kassa_db::entities::invoice_interest;
use kassa_db::repositories::InterestRepository;
use kassa_shared::types::{InvoiceId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::ApiError;
use crate::AppState;

/// Creates the interest routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/invoices/{invoice_id}/interest",
            post(calculate_interest).get(interest_history),
        )
        .route("/interest/run", post(run_interest))
}

/// Request body for an interest calculation.
#[derive(Debug, Deserialize)]
pub struct CalculateInterestRequest {
    /// Daily rate as a fraction (0.0005 = 0.05% per day).
    pub daily_rate: Decimal,
    /// Calculation date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

/// Response for an interest outcome.
#[derive(Debug, Serialize)]
pub struct InterestResponse {
    /// Whole days past the due date.
    pub days_overdue: i64,
    /// Outstanding balance interest was computed on.
    pub principal: Decimal,
    /// Daily rate applied.
    pub daily_rate: Decimal,
    /// Accrued interest.
    pub interest: Decimal,
}

impl From<InterestOutcome> for InterestResponse {
    fn from(outcome: InterestOutcome) -> Self {
        Self {
            days_overdue: outcome.days_overdue,
            principal: outcome.principal,
            daily_rate: outcome.daily_rate,
            interest: outcome.interest,
        }
    }
}

/// Response for one interest history row.
#[derive(Debug, Serialize)]
pub struct InterestHistoryResponse {
    /// History row ID.
    pub id: Uuid,
    /// Date the calculation was run for.
    pub calculated_on: NaiveDate,
    /// Outstanding balance at calculation time.
    pub principal: Decimal,
    /// Whole days past the due date.
    pub days_overdue: i64,
    /// Daily rate applied.
    pub daily_rate: Decimal,
    /// Accrued interest.
    pub interest: Decimal,
}

impl From<invoice_interest::Model> for InterestHistoryResponse {
    fn from(model: invoice_interest::Model) -> Self {
        Self {
            id: model.id,
            calculated_on: model.calculated_on,
            principal: model.principal,
            days_overdue: model.days_overdue,
            daily_rate: model.daily_rate,
            interest: model.interest,
        }
    }
}

/// POST `/invoices/{invoice_id}/interest` - Calculate interest for one invoice.
async fn calculate_interest(
    State(state): State<AppState>,
    Path((tenant_id, invoice_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CalculateInterestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let as_of = payload.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let repo = InterestRepository::new(state.conn());
    let outcome = repo
        .calculate(
            TenantId::from_uuid(tenant_id),
            InvoiceId::from_uuid(invoice_id),
            payload.daily_rate,
            as_of,
        )
        .await?;

    Ok(Json(InterestResponse::from(outcome)))
}

/// GET `/invoices/{invoice_id}/interest` - Append-only history, newest first.
async fn interest_history(
    State(state): State<AppState>,
    Path((tenant_id, invoice_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InterestRepository::new(state.conn());
    let history = repo
        .interest_history(
            TenantId::from_uuid(tenant_id),
            InvoiceId::from_uuid(invoice_id),
        )
        .await?;

    let items: Vec<InterestHistoryResponse> = history.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// POST `/interest/run` - Batch calculation over every overdue open invoice.
async fn run_interest(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CalculateInterestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let as_of = payload.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let repo = InterestRepository::new(state.conn());
    let batch = repo
        .calculate_overdue(TenantId::from_uuid(tenant_id), payload.daily_rate, as_of)
        .await?;

    let processed: Vec<serde_json::Value> = batch
        .processed
        .into_iter()
        .map(|(invoice_id, outcome)| {
            serde_json::json!({
                "invoice_id": invoice_id,
                "outcome": InterestResponse::from(outcome),
            })
        })
        .collect();
    let failures: Vec<serde_json::Value> = batch
        .failures
        .into_iter()
        .map(|(invoice_id, message)| {
            serde_json::json!({
                "invoice_id": invoice_id,
                "error": message,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "processed": processed,
        "failures": failures,
    })))
}
