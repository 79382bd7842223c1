//! Journal entry routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use kassa_core::ledger::{EntryStatus, JournalLineInput, PostEntryInput};
use kassa_db::repositories::ledger::{EntryFilter, EntryWithLines, LedgerRepository};
use kassa_db::entities::{journal_entries, journal_lines};
use kassa_shared::types::{JournalEntryId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extractors::ActorId;
use crate::response::ApiError;
use crate::AppState;

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", post(post_entry).get(list_entries))
        .route("/journal-entries/{entry_id}", get(get_entry))
        .route("/journal-entries/{entry_id}/reverse", post(reverse_entry))
}

/// Request body for a journal line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit amount (zero if crediting).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero if debiting).
    #[serde(default)]
    pub credit: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Request body for posting a journal entry.
#[derive(Debug, Deserialize)]
pub struct PostEntryRequest {
    /// Effective date (YYYY-MM-DD).
    pub entry_date: NaiveDate,
    /// Description of the business event.
    pub memo: Option<String>,
    /// The lines (at least 2, balanced).
    pub lines: Vec<LineRequest>,
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Response for a journal line.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Account posted to.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Response for a journal entry header.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Effective date.
    pub entry_date: NaiveDate,
    /// Description.
    pub memo: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// Entry this one reverses, if any.
    pub reversal_of: Option<Uuid>,
    /// Entry that reversed this one, if any.
    pub reversed_by: Option<Uuid>,
    /// Created by user ID.
    pub created_by: Uuid,
    /// Created at timestamp.
    pub created_at: String,
    /// Lines, when loaded.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<LineResponse>,
}

fn entry_response(entry: journal_entries::Model, lines: Vec<journal_lines::Model>) -> EntryResponse {
    EntryResponse {
        id: entry.id,
        entry_date: entry.entry_date,
        memo: entry.memo,
        status: entry.status.into(),
        reversal_of: entry.reversal_of,
        reversed_by: entry.reversed_by,
        created_by: entry.created_by,
        created_at: entry.created_at.to_rfc3339(),
        lines: lines
            .into_iter()
            .map(|l| LineResponse {
                id: l.id,
                account_id: l.account_id,
                debit: l.debit,
                credit: l.credit,
                memo: l.memo,
            })
            .collect(),
    }
}

impl From<EntryWithLines> for EntryResponse {
    fn from(value: EntryWithLines) -> Self {
        entry_response(value.entry, value.lines)
    }
}

/// POST `/journal-entries` - Validate and post an entry.
async fn post_entry(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    ActorId(actor): ActorId,
    Json(payload): Json<PostEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = PostEntryInput {
        entry_date: payload.entry_date,
        memo: payload.memo,
        lines: payload
            .lines
            .into_iter()
            .map(|l| JournalLineInput {
                account_id: kassa_shared::types::AccountId::from_uuid(l.account_id),
                debit: l.debit,
                credit: l.credit,
                memo: l.memo,
            })
            .collect(),
    };

    let repo = LedgerRepository::new(state.conn());
    let posted = repo
        .post_entry(TenantId::from_uuid(tenant_id), input, actor)
        .await?;

    Ok((StatusCode::CREATED, Json(EntryResponse::from(posted))))
}

/// GET `/journal-entries` - List entry headers with filters.
async fn list_entries(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new(state.conn());
    let entries = repo
        .list_entries(
            TenantId::from_uuid(tenant_id),
            EntryFilter {
                status: query.status,
                date_from: query.from,
                date_to: query.to,
            },
        )
        .await?;

    let items: Vec<EntryResponse> = entries
        .into_iter()
        .map(|e| entry_response(e, Vec::new()))
        .collect();
    Ok(Json(items))
}

/// GET `/journal-entries/{entry_id}` - Entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new(state.conn());
    let entry = repo
        .get_entry(
            TenantId::from_uuid(tenant_id),
            JournalEntryId::from_uuid(entry_id),
        )
        .await?;

    Ok(Json(EntryResponse::from(entry)))
}

/// POST `/journal-entries/{entry_id}/reverse` - Reverse a posted entry.
async fn reverse_entry(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(Uuid, Uuid)>,
    ActorId(actor): ActorId,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LedgerRepository::new(state.conn());
    let reversal = repo
        .reverse_entry(
            TenantId::from_uuid(tenant_id),
            JournalEntryId::from_uuid(entry_id),
            actor,
            Utc::now().date_naive(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EntryResponse::from(reversal))))
}
