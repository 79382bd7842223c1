//! Contact routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use kassa_db::entities::{contacts, sea_orm_active_enums::ContactKind};
use kassa_db::repositories::{ContactRepository, CreateContactInput};
use kassa_shared::types::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::ApiError;
use crate::AppState;

/// Creates the contact routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/contacts", post(create_contact).get(list_contacts))
}

/// Request body for creating a contact.
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    /// Display name.
    pub name: String,
    /// Customer, supplier, or both.
    pub kind: ContactKind,
    /// Optional email address.
    pub email: Option<String>,
}

/// Response for a contact.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Contact ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Customer, supplier, or both.
    pub kind: ContactKind,
    /// Optional email address.
    pub email: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<contacts::Model> for ContactResponse {
    fn from(model: contacts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            kind: model.kind,
            email: model.email,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// POST `/contacts` - Create a contact.
async fn create_contact(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ContactRepository::new(state.conn());
    let contact = repo
        .create_contact(
            TenantId::from_uuid(tenant_id),
            CreateContactInput {
                name: payload.name,
                kind: payload.kind,
                email: payload.email,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ContactResponse::from(contact))))
}

/// GET `/contacts` - List the tenant's contacts.
async fn list_contacts(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ContactRepository::new(state.conn());
    let contacts = repo.list_contacts(TenantId::from_uuid(tenant_id)).await?;

    let items: Vec<ContactResponse> = contacts.into_iter().map(Into::into).collect();
    Ok(Json(items))
}
