//! Contact repository for counterparty records.

use chrono::Utc;
use kassa_shared::error::AppError;
use kassa_shared::types::{ContactId, TenantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{contacts, sea_orm_active_enums::ContactKind};

/// Input for creating a contact.
#[derive(Debug, Clone)]
pub struct CreateContactInput {
    /// Display name.
    pub name: String,
    /// Customer, supplier, or both.
    pub kind: ContactKind,
    /// Optional email address.
    pub email: Option<String>,
}

/// Contact repository.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    db: DatabaseConnection,
}

impl ContactRepository {
    /// Creates a new contact repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a contact.
    pub async fn create_contact(
        &self,
        tenant_id: TenantId,
        input: CreateContactInput,
    ) -> Result<contacts::Model, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation("Contact name is required".into()));
        }

        let now = Utc::now().into();
        let contact = contacts::ActiveModel {
            id: Set(ContactId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            name: Set(input.name),
            kind: Set(input.kind),
            email: Set(input.email),
            created_at: Set(now),
            updated_at: Set(now),
        };

        contact.insert(&self.db).await.map_err(map_db)
    }

    /// Lists the tenant's contacts, ordered by name.
    pub async fn list_contacts(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<contacts::Model>, AppError> {
        contacts::Entity::find()
            .filter(contacts::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(contacts::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db)
    }

    /// Gets a contact by id within the tenant.
    pub async fn get_contact(
        &self,
        tenant_id: TenantId,
        contact_id: ContactId,
    ) -> Result<contacts::Model, AppError> {
        contacts::Entity::find_by_id(contact_id.into_inner())
            .filter(contacts::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db)?
            .ok_or_else(|| AppError::NotFound(format!("Contact {contact_id}")))
    }
}

fn map_db(err: DbErr) -> AppError {
    if super::is_lock_conflict(&err) {
        AppError::Conflict(err.to_string())
    } else {
        AppError::Database(err.to_string())
    }
}
