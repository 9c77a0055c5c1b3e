use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    domain::TableStatus,
    dto::tables::{
        CreateTableRequest, TableCount, TableList, UpdateTableRequest, UpdateTableStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Table,
    response::ApiResponse,
    services::table_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables).post(create_table))
        .route("/count", get(count_tables))
        .route("/status/{status}", get(list_tables_by_status))
        .route("/{id}", get(get_table).put(update_table).delete(delete_table))
        .route("/{id}/status", patch(update_table_status))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TableCountQuery {
    pub status: Option<TableStatus>,
}

#[utoipa::path(get, path = "/api/tables", tag = "Tables")]
pub async fn list_tables(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<TableList>>> {
    table_service::list_tables(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/tables/count", params(TableCountQuery), tag = "Tables")]
pub async fn count_tables(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TableCountQuery>,
) -> AppResult<Json<ApiResponse<TableCount>>> {
    table_service::count_tables(&state, &user, query.status).await.map(Json)
}

#[utoipa::path(get, path = "/api/tables/status/{status}", tag = "Tables")]
pub async fn list_tables_by_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(status): Path<TableStatus>,
) -> AppResult<Json<ApiResponse<TableList>>> {
    table_service::list_tables_by_status(&state, &user, status).await.map(Json)
}

#[utoipa::path(get, path = "/api/tables/{id}", tag = "Tables")]
pub async fn get_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Table>>> {
    table_service::get_table(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/tables", request_body = CreateTableRequest, tag = "Tables")]
pub async fn create_table(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    table_service::create_table(&state, &user, payload).await.map(Json)
}

#[utoipa::path(put, path = "/api/tables/{id}", request_body = UpdateTableRequest, tag = "Tables")]
pub async fn update_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    table_service::update_table(&state, &user, id, payload).await.map(Json)
}

#[utoipa::path(patch, path = "/api/tables/{id}/status", request_body = UpdateTableStatusRequest, tag = "Tables")]
pub async fn update_table_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableStatusRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    table_service::update_table_status(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(delete, path = "/api/tables/{id}", tag = "Tables")]
pub async fn delete_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    table_service::delete_table(&state, &user, id).await.map(Json)
}
