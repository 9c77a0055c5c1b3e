use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    domain::RoleName,
    dto::inventory::{
        CreateInventoryItemRequest, CreateInventoryTransactionRequest, InventoryItemList,
        InventoryTransactionList, UpdateInventoryItemRequest, UpdateStockLevelRequest,
    },
    entity::{
        employees::Entity as Employees,
        inventory_items::{
            ActiveModel as ItemActive, Column as ItemCol, Entity as InventoryItems,
            Model as ItemModel,
        },
        inventory_transactions::{
            ActiveModel as TxActive, Column as TxCol, Entity as InventoryTransactions,
            Model as TxModel,
        },
    },
    error::{AppError, AppResult},
    identity,
    middleware::auth::{AuthUser, ensure_any_role},
    models::{InventoryItem, InventoryTransaction},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_inventory_items(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<InventoryItemList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let items = InventoryItems::find()
        .filter(ItemCol::RestaurantId.eq(scope.restaurant_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Inventory items",
        InventoryItemList { items },
        Some(Meta::empty()),
    ))
}

/// Items at or below their minimum stock level.
pub async fn list_low_stock_items(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<InventoryItemList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let items = InventoryItems::find()
        .filter(ItemCol::RestaurantId.eq(scope.restaurant_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .filter(|i| i.stock_level <= i.minimum_stock_level)
        .map(item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Low stock items",
        InventoryItemList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_inventory_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InventoryItem>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let item = find_owned(state, &scope, id).await?;

    Ok(ApiResponse::success(
        "Inventory item",
        item_from_entity(item),
        None,
    ))
}

pub async fn create_inventory_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInventoryItemRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;
    validate_fields(&payload.name, payload.stock_level, payload.minimum_stock_level, payload.cost)?;

    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(scope.restaurant_id),
        name: Set(payload.name),
        stock_level: Set(payload.stock_level),
        minimum_stock_level: Set(payload.minimum_stock_level),
        unit: Set(payload.unit),
        cost: Set(payload.cost),
        last_updated: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Inventory item created",
        item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_inventory_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateInventoryItemRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let existing = find_owned(state, &scope, id).await?;

    let name = payload.name.unwrap_or(existing.name.clone());
    let minimum = payload.minimum_stock_level.unwrap_or(existing.minimum_stock_level);
    let cost = payload.cost.unwrap_or(existing.cost);
    validate_fields(&name, existing.stock_level, minimum, cost)?;
    let unit = payload.unit.unwrap_or(existing.unit);

    let mut active: ItemActive = existing.into();
    active.name = Set(name);
    active.minimum_stock_level = Set(minimum);
    active.unit = Set(unit);
    active.cost = Set(cost);
    active.last_updated = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Inventory item updated",
        item_from_entity(item),
        Some(Meta::empty()),
    ))
}

/// Direct overwrite of the counted stock, not a delta. Negative counts
/// are rejected; the audit trail is written separately via transactions.
pub async fn update_stock_level(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStockLevelRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    if payload.stock_level < 0 {
        return Err(AppError::BadRequest("stock level must not be negative".into()));
    }

    let existing = find_owned(state, &scope, id).await?;

    let mut active: ItemActive = existing.into();
    active.stock_level = Set(payload.stock_level);
    active.last_updated = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Stock level updated",
        item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_inventory_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let existing = find_owned(state, &scope, id).await?;
    existing.delete(&state.orm).await?;

    Ok(ApiResponse::success(
        "Inventory item deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Records a signed stock movement against the calling employee. The
/// delta is audit only; it is never applied to the stock level.
pub async fn create_inventory_transaction(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInventoryTransactionRequest,
) -> AppResult<ApiResponse<InventoryTransaction>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    if payload.quantity_changed == 0 {
        return Err(AppError::BadRequest("quantity change must not be zero".into()));
    }
    if payload.reason.trim().is_empty() {
        return Err(AppError::BadRequest("reason must not be empty".into()));
    }

    // ownership check on the item before writing the movement
    find_owned(state, &scope, payload.inventory_item_id).await?;

    let tx = TxActive {
        id: Set(Uuid::new_v4()),
        inventory_item_id: Set(payload.inventory_item_id),
        employee_id: Set(scope.employee_id),
        quantity_changed: Set(payload.quantity_changed),
        reason: Set(payload.reason),
        transaction_date: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Inventory transaction recorded",
        transaction_from_entity(tx),
        Some(Meta::empty()),
    ))
}

pub async fn list_item_transactions(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<InventoryTransactionList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    find_owned(state, &scope, item_id).await?;

    let items = InventoryTransactions::find()
        .filter(TxCol::InventoryItemId.eq(item_id))
        .order_by_desc(TxCol::TransactionDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(transaction_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Inventory transactions",
        InventoryTransactionList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_transactions(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<InventoryTransactionList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let item_ids: Vec<Uuid> = InventoryItems::find()
        .filter(ItemCol::RestaurantId.eq(scope.restaurant_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    let items = InventoryTransactions::find()
        .filter(TxCol::InventoryItemId.is_in(item_ids))
        .order_by_desc(TxCol::TransactionDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(transaction_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Inventory transactions",
        InventoryTransactionList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_employee_transactions(
    state: &AppState,
    user: &AuthUser,
    employee_id: Uuid,
) -> AppResult<ApiResponse<InventoryTransactionList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let employee = Employees::find_by_id(employee_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(employee.restaurant_id)?;

    let items = InventoryTransactions::find()
        .filter(TxCol::EmployeeId.eq(employee_id))
        .order_by_desc(TxCol::TransactionDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(transaction_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Inventory transactions",
        InventoryTransactionList { items },
        Some(Meta::empty()),
    ))
}

pub async fn delete_inventory_transaction(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let tx = InventoryTransactions::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    // scope through the item the movement belongs to
    find_owned(state, &scope, tx.inventory_item_id).await?;

    tx.delete(&state.orm).await?;

    Ok(ApiResponse::success(
        "Inventory transaction deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn find_owned(
    state: &AppState,
    scope: &identity::Scope,
    id: Uuid,
) -> AppResult<ItemModel> {
    let item = InventoryItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(item.restaurant_id)?;
    Ok(item)
}

fn validate_fields(name: &str, stock: i32, minimum: i32, cost: Decimal) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("stock level must not be negative".into()));
    }
    if minimum < 0 {
        return Err(AppError::BadRequest(
            "minimum stock level must not be negative".into(),
        ));
    }
    if cost < Decimal::ZERO {
        return Err(AppError::BadRequest("cost must not be negative".into()));
    }
    Ok(())
}

fn item_from_entity(model: ItemModel) -> InventoryItem {
    InventoryItem {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        stock_level: model.stock_level,
        minimum_stock_level: model.minimum_stock_level,
        unit: model.unit,
        cost: model.cost,
        last_updated: model.last_updated.with_timezone(&Utc),
    }
}

fn transaction_from_entity(model: TxModel) -> InventoryTransaction {
    InventoryTransaction {
        id: model.id,
        inventory_item_id: model.inventory_item_id,
        employee_id: model.employee_id,
        quantity_changed: model.quantity_changed,
        reason: model.reason,
        transaction_date: model.transaction_date.with_timezone(&Utc),
    }
}
