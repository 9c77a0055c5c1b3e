use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Role,
    response::ApiResponse,
    services::role_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_role))
        .route("/user/{user_id}", get(list_roles_for_user))
        .route("/{id}", get(get_role).put(update_role).delete(delete_role))
}

#[utoipa::path(get, path = "/api/roles/{id}", tag = "Roles")]
pub async fn get_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Role>>> {
    role_service::get_role(&state, &user, id).await.map(Json)
}

#[utoipa::path(get, path = "/api/roles/user/{user_id}", tag = "Roles")]
pub async fn list_roles_for_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RoleList>>> {
    role_service::list_roles_for_user(&state, &user, user_id)
        .await
        .map(Json)
}

#[utoipa::path(post, path = "/api/roles", request_body = CreateRoleRequest, tag = "Roles")]
pub async fn create_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    role_service::create_role(&state, &user, payload).await.map(Json)
}

#[utoipa::path(put, path = "/api/roles/{id}", request_body = UpdateRoleRequest, tag = "Roles")]
pub async fn update_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    role_service::update_role(&state, &user, id, payload).await.map(Json)
}

#[utoipa::path(delete, path = "/api/roles/{id}", tag = "Roles")]
pub async fn delete_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    role_service::delete_role(&state, &user, id).await.map(Json)
}
