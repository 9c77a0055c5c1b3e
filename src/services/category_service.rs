use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::RoleName,
    dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    entity::{
        categories::{
            ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories,
            Model as CategoryModel,
        },
        menu_items::{Column as MenuItemCol, Entity as MenuItems},
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, STAFF, ensure_any_role},
    models::Category,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CategoryList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let items = Categories::find()
        .filter(CategoryCol::RestaurantId.eq(scope.restaurant_id))
        .filter(CategoryCol::IsActive.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Category>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let category = Categories::find_by_id(id)
        .filter(CategoryCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(category.restaurant_id)?;

    Ok(ApiResponse::success(
        "Category",
        category_from_entity(category),
        None,
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;
    validate_name_description(&payload.name, &payload.description)?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(scope.restaurant_id),
        name: Set(payload.name),
        description: Set(payload.description),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    events::publish(state, scope.restaurant_id, DomainEvent::CategoryChanged).await;

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    // ownership before any field mapping
    scope.authorize(existing.restaurant_id)?;

    let name = payload.name.unwrap_or(existing.name.clone());
    let description = payload.description.unwrap_or(existing.description.clone());
    validate_name_description(&name, &description)?;

    let mut active: CategoryActive = existing.into();
    active.name = Set(name);
    active.description = Set(description);
    let category = active.update(&state.orm).await?;

    events::publish(state, scope.restaurant_id, DomainEvent::CategoryChanged).await;

    Ok(ApiResponse::success(
        "Category updated",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

/// Soft-delete; cascades inactive to every menu item the category owns,
/// all inside one transaction.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;

    let existing = Categories::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    let mut active: CategoryActive = existing.into();
    active.is_active = Set(false);
    active.update(&txn).await?;

    MenuItems::update_many()
        .col_expr(MenuItemCol::IsActive, Expr::value(false))
        .filter(MenuItemCol::CategoryId.eq(id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::CategoryChanged).await;

    Ok(ApiResponse::success(
        "Category deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_name_description(name: &str, description: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if description.trim().is_empty() {
        return Err(AppError::BadRequest("description must not be empty".into()));
    }
    Ok(())
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        description: model.description,
        is_active: model.is_active,
    }
}
