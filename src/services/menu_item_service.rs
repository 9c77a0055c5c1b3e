use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    domain::RoleName,
    dto::menu_items::{
        CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest, UpdatePriceRequest,
    },
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        menu_items::{
            ActiveModel as MenuItemActive, Column as MenuItemCol, Entity as MenuItems,
            Model as MenuItemModel,
        },
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, STAFF, ensure_any_role},
    models::MenuItem,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_menu_items(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<MenuItemList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let items = MenuItems::find()
        .filter(MenuItemCol::RestaurantId.eq(scope.restaurant_id))
        .filter(MenuItemCol::IsActive.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Menu items",
        MenuItemList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_menu_items_by_category(
    state: &AppState,
    user: &AuthUser,
    category_id: Uuid,
) -> AppResult<ApiResponse<MenuItemList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let category = Categories::find_by_id(category_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(category.restaurant_id)?;

    let items = MenuItems::find()
        .filter(MenuItemCol::CategoryId.eq(category_id))
        .filter(MenuItemCol::IsActive.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Menu items",
        MenuItemList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let item = MenuItems::find_by_id(id)
        .filter(MenuItemCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(item.restaurant_id)?;

    Ok(ApiResponse::success(
        "Menu item",
        menu_item_from_entity(item),
        None,
    ))
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;
    validate_fields(&payload.name, &payload.description, payload.price)?;

    // the category must belong to our restaurant and still be active
    let category = Categories::find_by_id(payload.category_id)
        .filter(CategoryCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(category.restaurant_id)?;

    let item = MenuItemActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        restaurant_id: Set(scope.restaurant_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        image_url: Set(payload.image_url),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    events::publish(state, scope.restaurant_id, DomainEvent::MenuItemChanged).await;

    Ok(ApiResponse::success(
        "Menu item created",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    let name = payload.name.unwrap_or(existing.name.clone());
    let description = payload.description.unwrap_or(existing.description.clone());
    let price = payload.price.unwrap_or(existing.price);
    validate_fields(&name, &description, price)?;

    let image_url = payload.image_url.or(existing.image_url.clone());

    let mut active: MenuItemActive = existing.into();
    active.name = Set(name);
    active.description = Set(description);
    active.price = Set(price);
    active.image_url = Set(image_url);
    let item = active.update(&state.orm).await?;

    events::publish(state, scope.restaurant_id, DomainEvent::MenuItemChanged).await;

    Ok(ApiResponse::success(
        "Menu item updated",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

/// Price-only update. Existing order lines keep their frozen prices.
pub async fn update_menu_item_price(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePriceRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    if payload.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".into()));
    }

    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    let mut active: MenuItemActive = existing.into();
    active.price = Set(payload.price);
    let item = active.update(&state.orm).await?;

    events::publish(state, scope.restaurant_id, DomainEvent::MenuItemChanged).await;

    Ok(ApiResponse::success(
        "Menu item price updated",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    let mut active: MenuItemActive = existing.into();
    active.is_active = Set(false);
    active.update(&state.orm).await?;

    events::publish(state, scope.restaurant_id, DomainEvent::MenuItemChanged).await;

    Ok(ApiResponse::success(
        "Menu item deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_fields(name: &str, description: &str, price: Decimal) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if description.trim().is_empty() {
        return Err(AppError::BadRequest("description must not be empty".into()));
    }
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".into()));
    }
    Ok(())
}

pub(crate) fn menu_item_from_entity(model: MenuItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        category_id: model.category_id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        description: model.description,
        price: model.price,
        image_url: model.image_url,
        is_active: model.is_active,
    }
}
