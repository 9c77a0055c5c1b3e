use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::employees::{CreateEmployeeRequest, EmployeeList, UpdateEmployeeRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Employee,
    response::ApiResponse,
    services::employee_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_employee))
        .route("/restaurant/{restaurant_id}", get(list_employees))
        .route(
            "/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

#[utoipa::path(get, path = "/api/employees/restaurant/{restaurant_id}", tag = "Employees")]
pub async fn list_employees(
    State(state): State<AppState>,
    user: AuthUser,
    Path(restaurant_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EmployeeList>>> {
    employee_service::list_employees(&state, &user, restaurant_id)
        .await
        .map(Json)
}

#[utoipa::path(get, path = "/api/employees/{id}", tag = "Employees")]
pub async fn get_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    employee_service::get_employee(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/employees", request_body = CreateEmployeeRequest, tag = "Employees")]
pub async fn create_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateEmployeeRequest>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    employee_service::create_employee(&state, &user, payload)
        .await
        .map(Json)
}

#[utoipa::path(put, path = "/api/employees/{id}", request_body = UpdateEmployeeRequest, tag = "Employees")]
pub async fn update_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    employee_service::update_employee(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(delete, path = "/api/employees/{id}", tag = "Employees")]
pub async fn delete_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    employee_service::delete_employee(&state, &user, id).await.map(Json)
}
