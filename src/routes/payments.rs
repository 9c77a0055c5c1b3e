use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::payments::{CreatePaymentRequest, PaymentList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Payment,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(make_payment))
        .route("/order/{order_id}", get(get_payment_for_order))
        .route("/{id}", get(get_payment))
}

#[utoipa::path(post, path = "/api/payments", request_body = CreatePaymentRequest, tag = "Payments")]
pub async fn make_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    payment_service::make_payment(&state, &user, payload).await.map(Json)
}

#[utoipa::path(get, path = "/api/payments", tag = "Payments")]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    payment_service::list_payments(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/payments/{id}", tag = "Payments")]
pub async fn get_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    payment_service::get_payment(&state, &user, id).await.map(Json)
}

#[utoipa::path(get, path = "/api/payments/order/{order_id}", tag = "Payments")]
pub async fn get_payment_for_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    payment_service::get_payment_for_order(&state, &user, order_id)
        .await
        .map(Json)
}
