//! Invoice lifecycle routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use kassa_core::invoice::{InvoiceLineInput, InvoiceStatus, InvoiceType};
use kassa_db::entities::{invoice_lines, invoices};
use kassa_db::repositories::invoice::{
    CreateInvoiceInput, InvoiceFilter, InvoiceRepository, InvoiceWithLines,
};
use kassa_shared::types::{ContactId, InvoiceId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extractors::ActorId;
use crate::response::ApiError;
use crate::AppState;

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", post(create_invoice).get(list_invoices))
        .route("/invoices/{invoice_id}", axum::routing::get(get_invoice))
        .route("/invoices/{invoice_id}/send", post(send_invoice))
        .route("/invoices/{invoice_id}/void", post(void_invoice))
}

/// Request body for an invoice line.
#[derive(Debug, Deserialize)]
pub struct InvoiceLineRequest {
    /// Line description.
    pub description: String,
    /// Quantity (must be positive).
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Tax rate as a fraction (0.10 = 10%).
    #[serde(default)]
    pub tax_rate: Decimal,
}

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Sales or purchase.
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    /// Counterparty.
    pub contact_id: Uuid,
    /// Issue date (YYYY-MM-DD).
    pub issue_date: NaiveDate,
    /// Due date (YYYY-MM-DD).
    pub due_date: NaiveDate,
    /// Invoice lines (at least one).
    pub lines: Vec<InvoiceLineRequest>,
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Filter by invoice type.
    #[serde(rename = "type")]
    pub invoice_type: Option<InvoiceType>,
    /// Filter by status.
    pub status: Option<InvoiceStatus>,
    /// Filter by contact.
    pub contact_id: Option<Uuid>,
    /// Filter by issue date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by issue date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Text search on number and line descriptions.
    pub search: Option<String>,
}

/// Response for an invoice line.
#[derive(Debug, Serialize)]
pub struct InvoiceLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Position within the invoice.
    pub position: i32,
    /// Description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Tax rate.
    pub tax_rate: Decimal,
    /// quantity × unit_price, rounded.
    pub line_subtotal: Decimal,
    /// line_subtotal × tax_rate, rounded.
    pub line_tax: Decimal,
}

/// Response for an invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Sales or purchase.
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    /// Tenant-sequential number.
    pub number: String,
    /// Counterparty.
    pub contact_id: Uuid,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Current status.
    pub status: InvoiceStatus,
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Sum of line taxes.
    pub tax: Decimal,
    /// subtotal + tax.
    pub total: Decimal,
    /// Sum of allocations applied so far.
    pub amount_paid: Decimal,
    /// total − amount_paid.
    pub amount_due: Decimal,
    /// Recognition entry, once sent.
    pub journal_entry_id: Option<Uuid>,
    /// Created at timestamp.
    pub created_at: String,
    /// Lines, when loaded.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<InvoiceLineResponse>,
}

fn invoice_response(
    invoice: invoices::Model,
    lines: Vec<invoice_lines::Model>,
) -> InvoiceResponse {
    let amount_due = invoice.amount_due();
    InvoiceResponse {
        id: invoice.id,
        invoice_type: invoice.invoice_type.into(),
        number: invoice.number,
        contact_id: invoice.contact_id,
        issue_date: invoice.issue_date,
        due_date: invoice.due_date,
        status: invoice.status.into(),
        subtotal: invoice.subtotal,
        tax: invoice.tax,
        total: invoice.total,
        amount_paid: invoice.amount_paid,
        amount_due,
        journal_entry_id: invoice.journal_entry_id,
        created_at: invoice.created_at.to_rfc3339(),
        lines: lines
            .into_iter()
            .map(|l| InvoiceLineResponse {
                id: l.id,
                position: l.position,
                description: l.description,
                quantity: l.quantity,
                unit_price: l.unit_price,
                tax_rate: l.tax_rate,
                line_subtotal: l.line_subtotal,
                line_tax: l.line_tax,
            })
            .collect(),
    }
}

impl From<InvoiceWithLines> for InvoiceResponse {
    fn from(value: InvoiceWithLines) -> Self {
        invoice_response(value.invoice, value.lines)
    }
}

/// POST `/invoices` - Create a draft invoice.
async fn create_invoice(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    ActorId(actor): ActorId,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateInvoiceInput {
        invoice_type: payload.invoice_type,
        contact_id: ContactId::from_uuid(payload.contact_id),
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        lines: payload
            .lines
            .into_iter()
            .map(|l| InvoiceLineInput {
                description: l.description,
                quantity: l.quantity,
                unit_price: l.unit_price,
                tax_rate: l.tax_rate,
            })
            .collect(),
    };

    let repo = InvoiceRepository::new(state.conn());
    let invoice = repo
        .create_invoice(TenantId::from_uuid(tenant_id), input, actor)
        .await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

/// GET `/invoices` - List invoice headers with filters.
async fn list_invoices(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.conn());
    let invoices = repo
        .list_invoices(
            TenantId::from_uuid(tenant_id),
            InvoiceFilter {
                invoice_type: query.invoice_type,
                status: query.status,
                contact_id: query.contact_id.map(ContactId::from_uuid),
                date_from: query.from,
                date_to: query.to,
                search: query.search,
            },
        )
        .await?;

    let items: Vec<InvoiceResponse> = invoices
        .into_iter()
        .map(|i| invoice_response(i, Vec::new()))
        .collect();
    Ok(Json(items))
}

/// GET `/invoices/{invoice_id}` - Invoice with its lines.
async fn get_invoice(
    State(state): State<AppState>,
    Path((tenant_id, invoice_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.conn());
    let invoice = repo
        .get_invoice(
            TenantId::from_uuid(tenant_id),
            InvoiceId::from_uuid(invoice_id),
        )
        .await?;

    Ok(Json(InvoiceResponse::from(invoice)))
}

/// POST `/invoices/{invoice_id}/send` - Send a draft invoice.
async fn send_invoice(
    State(state): State<AppState>,
    Path((tenant_id, invoice_id)): Path<(Uuid, Uuid)>,
    ActorId(actor): ActorId,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.conn());
    let invoice = repo
        .send_invoice(
            TenantId::from_uuid(tenant_id),
            InvoiceId::from_uuid(invoice_id),
            actor,
        )
        .await?;

    Ok(Json(invoice_response(invoice, Vec::new())))
}

/// POST `/invoices/{invoice_id}/void` - Void an invoice.
async fn void_invoice(
    State(state): State<AppState>,
    Path((tenant_id, invoice_id)): Path<(Uuid, Uuid)>,
    ActorId(actor): ActorId,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.conn());
    let invoice = repo
        .void_invoice(
            TenantId::from_uuid(tenant_id),
            InvoiceId::from_uuid(invoice_id),
            actor,
        )
        .await?;

    Ok(Json(invoice_response(invoice, Vec::new())))
}
