use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::{OrderStatus, RoleName, TableStatus},
    dto::tables::{
        CreateTableRequest, TableCount, TableList, UpdateTableRequest, UpdateTableStatusRequest,
    },
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        tables::{
            ActiveModel as TableActive, Column as TableCol, Entity as Tables, Model as TableModel,
        },
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, STAFF, ensure_any_role},
    models::Table,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_tables(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<TableList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let items = Tables::find()
        .filter(TableCol::RestaurantId.eq(scope.restaurant_id))
        .filter(TableCol::IsActive.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(table_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Tables",
        TableList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_table(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Table>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let table = Tables::find_by_id(id)
        .filter(TableCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(table.restaurant_id)?;

    Ok(ApiResponse::success("Table", table_from_entity(table), None))
}

pub async fn list_tables_by_status(
    state: &AppState,
    user: &AuthUser,
    status: TableStatus,
) -> AppResult<ApiResponse<TableList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let items = Tables::find()
        .filter(TableCol::RestaurantId.eq(scope.restaurant_id))
        .filter(TableCol::IsActive.eq(true))
        .filter(TableCol::Status.eq(status))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(table_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Tables",
        TableList { items },
        Some(Meta::empty()),
    ))
}

/// Active-table count, optionally narrowed to one floor state.
pub async fn count_tables(
    state: &AppState,
    user: &AuthUser,
    status: Option<TableStatus>,
) -> AppResult<ApiResponse<TableCount>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let mut query = Tables::find()
        .filter(TableCol::RestaurantId.eq(scope.restaurant_id))
        .filter(TableCol::IsActive.eq(true));
    if let Some(status) = status {
        query = query.filter(TableCol::Status.eq(status));
    }
    let count = query.count(&state.orm).await? as i64;

    Ok(ApiResponse::success("Table count", TableCount { count }, None))
}

pub async fn create_table(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;
    validate_fields(payload.number, payload.capacity)?;

    ensure_number_free(state, scope.restaurant_id, payload.number, None).await?;

    let table = TableActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(scope.restaurant_id),
        number: Set(payload.number),
        capacity: Set(payload.capacity),
        status: Set(TableStatus::Available),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    events::publish(state, scope.restaurant_id, DomainEvent::TableChanged).await;

    Ok(ApiResponse::success(
        "Table created",
        table_from_entity(table),
        Some(Meta::empty()),
    ))
}

pub async fn update_table(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let existing = Tables::find_by_id(id)
        .filter(TableCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    let number = payload.number.unwrap_or(existing.number);
    let capacity = payload.capacity.unwrap_or(existing.capacity);
    validate_fields(number, capacity)?;

    if number != existing.number {
        ensure_number_free(state, scope.restaurant_id, number, Some(id)).await?;
    }

    let mut active: TableActive = existing.into();
    active.number = Set(number);
    active.capacity = Set(capacity);
    let table = active.update(&state.orm).await?;

    events::publish(state, scope.restaurant_id, DomainEvent::TableChanged).await;

    Ok(ApiResponse::success(
        "Table updated",
        table_from_entity(table),
        Some(Meta::empty()),
    ))
}

/// Floor-state flip, open to all staff. A table with an order still in
/// flight cannot be put back to Available.
pub async fn update_table_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTableStatusRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;

    let existing = Tables::find_by_id(id)
        .filter(TableCol::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    if payload.status == TableStatus::Available && has_open_order(&txn, id).await? {
        return Err(AppError::Conflict(
            "table has an order in progress".into(),
        ));
    }

    let mut active: TableActive = existing.into();
    active.status = Set(payload.status);
    let table = active.update(&txn).await?;

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::TableChanged).await;

    Ok(ApiResponse::success(
        "Table status updated",
        table_from_entity(table),
        Some(Meta::empty()),
    ))
}

/// Soft-delete. Refused while any order on the table is still open; the
/// freed number becomes reusable for new tables.
pub async fn delete_table(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;

    let existing = Tables::find_by_id(id)
        .filter(TableCol::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    if has_open_order(&txn, id).await? {
        return Err(AppError::Conflict(
            "table has an order in progress".into(),
        ));
    }

    let mut active: TableActive = existing.into();
    active.is_active = Set(false);
    active.update(&txn).await?;

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::TableChanged).await;

    Ok(ApiResponse::success(
        "Table deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn has_open_order<C: sea_orm::ConnectionTrait>(conn: &C, table_id: Uuid) -> AppResult<bool> {
    let open = Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .filter(OrderCol::Status.is_not_in([OrderStatus::Completed, OrderStatus::Cancelled]))
        .count(conn)
        .await?;
    Ok(open > 0)
}

async fn ensure_number_free(
    state: &AppState,
    restaurant_id: Uuid,
    number: i32,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    let mut query = Tables::find()
        .filter(TableCol::RestaurantId.eq(restaurant_id))
        .filter(TableCol::Number.eq(number))
        .filter(TableCol::IsActive.eq(true));
    if let Some(id) = exclude {
        query = query.filter(TableCol::Id.ne(id));
    }
    if query.count(&state.orm).await? > 0 {
        return Err(AppError::Conflict(format!(
            "table number {number} already in use"
        )));
    }
    Ok(())
}

fn validate_fields(number: i32, capacity: i32) -> AppResult<()> {
    if number <= 0 {
        return Err(AppError::BadRequest("table number must be positive".into()));
    }
    if capacity <= 0 {
        return Err(AppError::BadRequest("capacity must be positive".into()));
    }
    Ok(())
}

pub(crate) fn table_from_entity(model: TableModel) -> Table {
    Table {
        id: model.id,
        restaurant_id: model.restaurant_id,
        number: model.number,
        capacity: model.capacity,
        status: model.status,
        is_active: model.is_active,
    }
}
