use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::inventory::{
        CreateInventoryItemRequest, CreateInventoryTransactionRequest, InventoryItemList,
        InventoryTransactionList, UpdateInventoryItemRequest, UpdateStockLevelRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{InventoryItem, InventoryTransaction},
    response::ApiResponse,
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_inventory_items).post(create_inventory_item))
        .route("/items/low-stock", get(list_low_stock_items))
        .route(
            "/items/{id}",
            get(get_inventory_item)
                .put(update_inventory_item)
                .delete(delete_inventory_item),
        )
        .route("/items/{id}/stock", patch(update_stock_level))
        .route("/items/{id}/transactions", get(list_item_transactions))
        .route("/transactions", get(list_transactions).post(create_inventory_transaction))
        .route("/transactions/employee/{employee_id}", get(list_employee_transactions))
        .route("/transactions/{id}", delete(delete_inventory_transaction))
}

#[utoipa::path(get, path = "/api/inventory/items", tag = "Inventory")]
pub async fn list_inventory_items(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<InventoryItemList>>> {
    inventory_service::list_inventory_items(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/inventory/items/low-stock", tag = "Inventory")]
pub async fn list_low_stock_items(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<InventoryItemList>>> {
    inventory_service::list_low_stock_items(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/inventory/items/{id}", tag = "Inventory")]
pub async fn get_inventory_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    inventory_service::get_inventory_item(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/inventory/items", request_body = CreateInventoryItemRequest, tag = "Inventory")]
pub async fn create_inventory_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInventoryItemRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    inventory_service::create_inventory_item(&state, &user, payload)
        .await
        .map(Json)
}

#[utoipa::path(put, path = "/api/inventory/items/{id}", request_body = UpdateInventoryItemRequest, tag = "Inventory")]
pub async fn update_inventory_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryItemRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    inventory_service::update_inventory_item(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(patch, path = "/api/inventory/items/{id}/stock", request_body = UpdateStockLevelRequest, tag = "Inventory")]
pub async fn update_stock_level(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStockLevelRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    inventory_service::update_stock_level(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(delete, path = "/api/inventory/items/{id}", tag = "Inventory")]
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    inventory_service::delete_inventory_item(&state, &user, id)
        .await
        .map(Json)
}

#[utoipa::path(post, path = "/api/inventory/transactions", request_body = CreateInventoryTransactionRequest, tag = "Inventory")]
pub async fn create_inventory_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInventoryTransactionRequest>,
) -> AppResult<Json<ApiResponse<InventoryTransaction>>> {
    inventory_service::create_inventory_transaction(&state, &user, payload)
        .await
        .map(Json)
}

#[utoipa::path(get, path = "/api/inventory/items/{id}/transactions", tag = "Inventory")]
pub async fn list_item_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryTransactionList>>> {
    inventory_service::list_item_transactions(&state, &user, id)
        .await
        .map(Json)
}

#[utoipa::path(get, path = "/api/inventory/transactions", tag = "Inventory")]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<InventoryTransactionList>>> {
    inventory_service::list_transactions(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/inventory/transactions/employee/{employee_id}", tag = "Inventory")]
pub async fn list_employee_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryTransactionList>>> {
    inventory_service::list_employee_transactions(&state, &user, employee_id)
        .await
        .map(Json)
}

#[utoipa::path(delete, path = "/api/inventory/transactions/{id}", tag = "Inventory")]
pub async fn delete_inventory_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    inventory_service::delete_inventory_transaction(&state, &user, id)
        .await
        .map(Json)
}
