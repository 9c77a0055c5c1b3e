use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    dto::invoices::{InvoiceDetails, InvoiceList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::invoice_service,
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyInvoicesQuery {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/daily", get(list_daily_invoices))
        .route("/order/{order_id}", post(generate_invoice).get(get_invoice_for_order))
        .route("/{id}", get(get_invoice))
}

#[utoipa::path(post, path = "/api/invoices/order/{order_id}", tag = "Invoices")]
pub async fn generate_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InvoiceDetails>>> {
    invoice_service::generate_invoice(&state, &user, order_id)
        .await
        .map(Json)
}

#[utoipa::path(get, path = "/api/invoices/{id}", tag = "Invoices")]
pub async fn get_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InvoiceDetails>>> {
    invoice_service::get_invoice(&state, &user, id).await.map(Json)
}

#[utoipa::path(get, path = "/api/invoices/order/{order_id}", tag = "Invoices")]
pub async fn get_invoice_for_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InvoiceDetails>>> {
    invoice_service::get_invoice_for_order(&state, &user, order_id)
        .await
        .map(Json)
}

#[utoipa::path(get, path = "/api/invoices", tag = "Invoices")]
pub async fn list_invoices(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<InvoiceList>>> {
    invoice_service::list_invoices(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/invoices/daily", params(DailyInvoicesQuery), tag = "Invoices")]
pub async fn list_daily_invoices(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DailyInvoicesQuery>,
) -> AppResult<Json<ApiResponse<InvoiceList>>> {
    invoice_service::list_daily_invoices(&state, &user, query.date)
        .await
        .map(Json)
}
