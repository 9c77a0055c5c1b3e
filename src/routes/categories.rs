use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Category,
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[utoipa::path(get, path = "/api/categories", tag = "Categories")]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    category_service::list_categories(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/categories/{id}", tag = "Categories")]
pub async fn get_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    category_service::get_category(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/categories", request_body = CreateCategoryRequest, tag = "Categories")]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    category_service::create_category(&state, &user, payload)
        .await
        .map(Json)
}

#[utoipa::path(put, path = "/api/categories/{id}", request_body = UpdateCategoryRequest, tag = "Categories")]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    category_service::update_category(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(delete, path = "/api/categories/{id}", tag = "Categories")]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    category_service::delete_category(&state, &user, id).await.map(Json)
}
