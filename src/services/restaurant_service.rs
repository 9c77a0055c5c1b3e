use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    dto::restaurants::{CreateRestaurantRequest, RestaurantList, UpdateRestaurantRequest},
    entity::{
        menu_items::{Column as MenuItemCol, Entity as MenuItems},
        orders::{Column as OrderCol, Entity as Orders},
        reservations::{Column as ReservationCol, Entity as Reservations},
        restaurants::{
            ActiveModel as RestaurantActive, Entity as Restaurants, Model as RestaurantModel,
        },
    },
    error::{AppError, AppResult},
    identity,
    middleware::auth::{AuthUser, STAFF, ensure_admin, ensure_any_role},
    models::Restaurant,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The restaurant the calling employee belongs to.
pub async fn get_my_restaurant(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let restaurant = Restaurants::find_by_id(scope.restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Restaurant",
        restaurant_from_entity(restaurant),
        None,
    ))
}

pub async fn list_restaurants(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<RestaurantList>> {
    ensure_admin(user)?;

    let items = Restaurants::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(restaurant_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Restaurants",
        RestaurantList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_admin(user)?;

    let restaurant = Restaurants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Restaurant",
        restaurant_from_entity(restaurant),
        None,
    ))
}

pub async fn create_restaurant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_admin(user)?;
    validate_fields(&payload.name, &payload.address, &payload.phone, &payload.email)?;

    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        address: Set(payload.address),
        phone: Set(payload.phone),
        email: Set(payload.email),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Restaurant created",
        restaurant_from_entity(restaurant),
        Some(Meta::empty()),
    ))
}

pub async fn update_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_admin(user)?;

    let existing = Restaurants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let name = payload.name.unwrap_or(existing.name.clone());
    let address = payload.address.unwrap_or(existing.address.clone());
    let phone = payload.phone.unwrap_or(existing.phone.clone());
    let email = payload.email.unwrap_or(existing.email.clone());
    validate_fields(&name, &address, &phone, &email)?;

    let mut active: RestaurantActive = existing.into();
    active.name = Set(name);
    active.address = Set(address);
    active.phone = Set(phone);
    active.email = Set(email);
    let restaurant = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Restaurant updated",
        restaurant_from_entity(restaurant),
        Some(Meta::empty()),
    ))
}

/// Hard delete, refused while operational records still reference the
/// restaurant. The schema keeps RESTRICT constraints underneath as a
/// backstop.
pub async fn delete_restaurant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let existing = Restaurants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let menu_items = MenuItems::find()
        .filter(MenuItemCol::RestaurantId.eq(id))
        .count(&state.orm)
        .await?;
    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(id))
        .count(&state.orm)
        .await?;
    let reservations = Reservations::find()
        .filter(ReservationCol::RestaurantId.eq(id))
        .count(&state.orm)
        .await?;
    if menu_items + orders + reservations > 0 {
        return Err(AppError::Conflict(
            "restaurant still has menu items, orders or reservations".into(),
        ));
    }

    existing.delete(&state.orm).await?;

    Ok(ApiResponse::success(
        "Restaurant deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_fields(name: &str, address: &str, phone: &str, email: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if address.trim().is_empty() {
        return Err(AppError::BadRequest("address must not be empty".into()));
    }
    if phone.trim().is_empty() {
        return Err(AppError::BadRequest("phone must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("email is not valid".into()));
    }
    Ok(())
}

fn restaurant_from_entity(model: RestaurantModel) -> Restaurant {
    Restaurant {
        id: model.id,
        name: model.name,
        address: model.address,
        phone: model.phone,
        email: model.email,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
