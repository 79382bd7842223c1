//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod contacts;
pub mod health;
pub mod interest;
pub mod invoices;
pub mod journal_entries;
pub mod payments;

/// Creates the router for all tenant-scoped routes.
pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(contacts::routes())
        .merge(journal_entries::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(interest::routes())
}
