use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::restaurants::{CreateRestaurantRequest, RestaurantList, UpdateRestaurantRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Restaurant,
    response::ApiResponse,
    services::restaurant_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_restaurants).post(create_restaurant))
        .route("/mine", get(get_my_restaurant))
        .route(
            "/{id}",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
}

#[utoipa::path(get, path = "/api/restaurants/mine", tag = "Restaurants")]
pub async fn get_my_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    restaurant_service::get_my_restaurant(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/restaurants", tag = "Restaurants")]
pub async fn list_restaurants(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RestaurantList>>> {
    restaurant_service::list_restaurants(&state, &user).await.map(Json)
}

#[utoipa::path(get, path = "/api/restaurants/{id}", tag = "Restaurants")]
pub async fn get_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    restaurant_service::get_restaurant(&state, &user, id).await.map(Json)
}

#[utoipa::path(post, path = "/api/restaurants", request_body = CreateRestaurantRequest, tag = "Restaurants")]
pub async fn create_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRestaurantRequest>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    restaurant_service::create_restaurant(&state, &user, payload)
        .await
        .map(Json)
}

#[utoipa::path(put, path = "/api/restaurants/{id}", request_body = UpdateRestaurantRequest, tag = "Restaurants")]
pub async fn update_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    restaurant_service::update_restaurant(&state, &user, id, payload)
        .await
        .map(Json)
}

#[utoipa::path(delete, path = "/api/restaurants/{id}", tag = "Restaurants")]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    restaurant_service::delete_restaurant(&state, &user, id)
        .await
        .map(Json)
}
