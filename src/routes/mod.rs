use axum::{Router, routing::get};

use crate::state::AppState;

pub mod categories;
pub mod doc;
pub mod employees;
pub mod events;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod menu_items;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod restaurants;
pub mod roles;
pub mod tables;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/categories", categories::router())
        .nest("/menu-items", menu_items::router())
        .nest("/tables", tables::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::router())
        .nest("/invoices", invoices::router())
        .nest("/reservations", reservations::router())
        .nest("/inventory", inventory::router())
        .nest("/reports", reports::router())
        .nest("/restaurants", restaurants::router())
        .nest("/employees", employees::router())
        .nest("/roles", roles::router())
        .nest("/events", events::router())
}
