use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    domain::OrderStatus,
    dto::orders::{CreateOrderRequest, OrderDetails, OrderList, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/active", get(list_active_orders))
        .route("/day", get(list_orders_by_day))
        .route("/status/{status}", get(list_orders_by_status))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(update_order_status))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrdersByDayQuery {
    pub date: NaiveDate,
}

#[utoipa::path(get, path = "/api/orders", tag = "Orders")]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    order_service::list_orders(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/orders/active", tag = "Orders")]
pub async fn list_active_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    order_service::list_active_orders(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/orders/day", params(OrdersByDayQuery), tag = "Orders")]
pub async fn list_orders_by_day(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrdersByDayQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    order_service::list_orders_by_day(&state, &user, query.date).await.map(Json)
}

#[utoipa::path(get, path = "/api/orders/status/{status}", tag = "Orders")]
pub async fn list_orders_by_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(status): Path<OrderStatus>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    order_service::list_orders_by_status(&state, &user, status).await.map(Json)
}

#[utoipa::path(get, path = "/api/orders/{id}", tag = "Orders")]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderDetails>>> {
    order_service::get_order(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/orders", request_body = CreateOrderRequest, tag = "Orders")]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderDetails>>> {
    order_service::create_order(&state, &user, payload).await.map(Json)
}

#[utoipa::path(patch, path = "/api/orders/{id}/status", request_body = UpdateOrderStatusRequest, tag = "Orders")]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderDetails>>> {
    order_service::update_order_status(&state, &user, id, payload)
        .await
        .map(Json)
}
