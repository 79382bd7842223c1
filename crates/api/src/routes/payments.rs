//! Payment and allocation routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use kassa_core::payment::PaymentDirection;
use kassa_db::entities::{allocations, payments};
use kassa_db::repositories::payment::{
    CreatePaymentInput, PaymentFilter, PaymentRepository, PaymentWithAllocations,
};
use kassa_shared::types::{ContactId, InvoiceId, PaymentId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extractors::ActorId;
use crate::response::ApiError;
use crate::AppState;

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment).get(list_payments))
        .route("/payments/unallocated", get(unallocated_payments))
        .route("/payments/{payment_id}", get(get_payment))
        .route("/payments/{payment_id}/allocations", post(allocate))
}

/// Request body for creating a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Received or made.
    pub direction: PaymentDirection,
    /// Counterparty.
    pub contact_id: Uuid,
    /// Payment amount (must be positive).
    pub amount: Decimal,
    /// Date of the payment (YYYY-MM-DD).
    pub payment_date: NaiveDate,
}

/// Request body for allocating part of a payment to an invoice.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    /// Invoice to allocate to.
    pub invoice_id: Uuid,
    /// Allocation amount (must be positive).
    pub amount: Decimal,
}

/// Query parameters for listing payments.
#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    /// Filter by direction.
    pub direction: Option<PaymentDirection>,
    /// Filter by contact.
    pub contact_id: Option<Uuid>,
    /// Filter by payment date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by payment date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Query parameters for the unallocated payments endpoint.
#[derive(Debug, Deserialize)]
pub struct UnallocatedQuery {
    /// Filter by direction.
    pub direction: Option<PaymentDirection>,
}

/// Response for an allocation.
#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    /// Allocation ID.
    pub id: Uuid,
    /// The payment allocated from.
    pub payment_id: Uuid,
    /// The invoice allocated to.
    pub invoice_id: Uuid,
    /// Allocation amount.
    pub amount: Decimal,
    /// Cash-movement entry posted for this allocation.
    pub journal_entry_id: Uuid,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<allocations::Model> for AllocationResponse {
    fn from(model: allocations::Model) -> Self {
        Self {
            id: model.id,
            payment_id: model.payment_id,
            invoice_id: model.invoice_id,
            amount: model.amount,
            journal_entry_id: model.journal_entry_id,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response for a payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Received or made.
    pub direction: PaymentDirection,
    /// Counterparty.
    pub contact_id: Uuid,
    /// Payment amount.
    pub amount: Decimal,
    /// Remaining unallocated amount, when computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_unallocated: Option<Decimal>,
    /// Date of the payment.
    pub payment_date: NaiveDate,
    /// Created at timestamp.
    pub created_at: String,
    /// Allocations, when loaded.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allocations: Vec<AllocationResponse>,
}

fn payment_response(payment: payments::Model) -> PaymentResponse {
    PaymentResponse {
        id: payment.id,
        direction: payment.direction.into(),
        contact_id: payment.contact_id,
        amount: payment.amount,
        amount_unallocated: None,
        payment_date: payment.payment_date,
        created_at: payment.created_at.to_rfc3339(),
        allocations: Vec::new(),
    }
}

impl From<PaymentWithAllocations> for PaymentResponse {
    fn from(value: PaymentWithAllocations) -> Self {
        let mut response = payment_response(value.payment);
        response.amount_unallocated = Some(value.amount_unallocated);
        response.allocations = value.allocations.into_iter().map(Into::into).collect();
        response
    }
}

/// POST `/payments` - Create a payment with no allocations.
async fn create_payment(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    ActorId(actor): ActorId,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentRepository::new(state.conn());
    let payment = repo
        .create_payment(
            TenantId::from_uuid(tenant_id),
            CreatePaymentInput {
                direction: payload.direction,
                contact_id: ContactId::from_uuid(payload.contact_id),
                amount: payload.amount,
                payment_date: payload.payment_date,
            },
            actor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment_response(payment))))
}

/// POST `/payments/{payment_id}/allocations` - Allocate to an invoice.
async fn allocate(
    State(state): State<AppState>,
    Path((tenant_id, payment_id)): Path<(Uuid, Uuid)>,
    ActorId(actor): ActorId,
    Json(payload): Json<AllocateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentRepository::new(state.conn());
    let outcome = repo
        .allocate(
            TenantId::from_uuid(tenant_id),
            PaymentId::from_uuid(payment_id),
            InvoiceId::from_uuid(payload.invoice_id),
            payload.amount,
            actor,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "allocation": AllocationResponse::from(outcome.allocation),
            "invoice_status": kassa_core::invoice::InvoiceStatus::from(outcome.invoice.status),
            "invoice_amount_due": outcome.invoice.total - outcome.invoice.amount_paid,
        })),
    ))
}

/// GET `/payments` - List payment headers with filters.
async fn list_payments(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentRepository::new(state.conn());
    let payments = repo
        .list_payments(
            TenantId::from_uuid(tenant_id),
            PaymentFilter {
                direction: query.direction,
                contact_id: query.contact_id.map(ContactId::from_uuid),
                date_from: query.from,
                date_to: query.to,
            },
        )
        .await?;

    let items: Vec<PaymentResponse> = payments.into_iter().map(payment_response).collect();
    Ok(Json(items))
}

/// GET `/payments/unallocated` - Payments with remaining balance, oldest first.
async fn unallocated_payments(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<UnallocatedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentRepository::new(state.conn());
    let payments = repo
        .unallocated_payments(TenantId::from_uuid(tenant_id), query.direction)
        .await?;

    let items: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

/// GET `/payments/{payment_id}` - Payment with its allocations.
async fn get_payment(
    State(state): State<AppState>,
    Path((tenant_id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentRepository::new(state.conn());
    let payment = repo
        .get_payment(
            TenantId::from_uuid(tenant_id),
            PaymentId::from_uuid(payment_id),
        )
        .await?;

    Ok(Json(PaymentResponse::from(payment)))
}
