use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    dto::reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Reservation,
    response::ApiResponse,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/search", get(search_reservations))
        .route("/{id}", get(get_reservation).put(update_reservation))
        .route("/{id}/cancel", post(cancel_reservation))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationSearchQuery {
    pub customer_name: String,
}

#[utoipa::path(get, path = "/api/reservations", tag = "Reservations")]
pub async fn list_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    reservation_service::list_reservations(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/reservations/search", params(ReservationSearchQuery), tag = "Reservations")]
pub async fn search_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReservationSearchQuery>,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    reservation_service::search_reservations(&state, &user, &query.customer_name)
        .await
        .map(Json)
}

#[utoipa::path(get, path = "/api/reservations/{id}", tag = "Reservations")]
pub async fn get_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    reservation_service::get_reservation(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/reservations", request_body = CreateReservationRequest, tag = "Reservations")]
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    reservation_service::create_reservation(&state, &user, payload)
        .await
        .map(Json)
}

#[utoipa::path(put, path = "/api/reservations/{id}", request_body = UpdateReservationRequest, tag = "Reservations")]
pub async fn update_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    reservation_service::update_reservation(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(post, path = "/api/reservations/{id}/cancel", tag = "Reservations")]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    reservation_service::cancel_reservation(&state, &user, id)
        .await
        .map(Json)
}
