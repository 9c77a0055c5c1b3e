use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::menu_items::{
        CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest, UpdatePriceRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::MenuItem,
    response::ApiResponse,
    services::menu_item_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu_items).post(create_menu_item))
        .route(
            "/{id}",
            get(get_menu_item).put(update_menu_item).delete(delete_menu_item),
        )
        .route("/{id}/price", patch(update_menu_item_price))
        .route("/category/{category_id}", get(list_menu_items_by_category))
}

#[utoipa::path(get, path = "/api/menu-items", tag = "Menu")]
pub async fn list_menu_items(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MenuItemList>>> {
    menu_item_service::list_menu_items(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/menu-items/category/{category_id}", tag = "Menu")]
pub async fn list_menu_items_by_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MenuItemList>>> {
    menu_item_service::list_menu_items_by_category(&state, &user, category_id)
        .await
        .map(Json)
}

#[utoipa::path(get, path = "/api/menu-items/{id}", tag = "Menu")]
pub async fn get_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    menu_item_service::get_menu_item(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/menu-items", request_body = CreateMenuItemRequest, tag = "Menu")]
pub async fn create_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    menu_item_service::create_menu_item(&state, &user, payload)
        .await
        .map(Json)
}

#[utoipa::path(put, path = "/api/menu-items/{id}", request_body = UpdateMenuItemRequest, tag = "Menu")]
pub async fn update_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    menu_item_service::update_menu_item(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(patch, path = "/api/menu-items/{id}/price", request_body = UpdatePriceRequest, tag = "Menu")]
pub async fn update_menu_item_price(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePriceRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    menu_item_service::update_menu_item_price(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(delete, path = "/api/menu-items/{id}", tag = "Menu")]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    menu_item_service::delete_menu_item(&state, &user, id).await.map(Json)
}
