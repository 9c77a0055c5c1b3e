use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::{OrderStatus, TableStatus},
    dto::orders::{CreateOrderRequest, OrderDetails, OrderLine, OrderList, UpdateOrderStatusRequest},
    entity::{
        menu_items::{Column as MenuItemCol, Entity as MenuItems},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        tables::{ActiveModel as TableActive, Column as TableCol, Entity as Tables},
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, STAFF, ensure_any_role},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(scope.restaurant_id))
        .all(&state.orm)
        .await?;

    let items = assemble_details(&state.orm, orders).await?;

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

/// Orders still moving through the kitchen: everything not yet Completed
/// or Cancelled.
pub async fn list_active_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(scope.restaurant_id))
        .filter(OrderCol::Status.is_not_in([OrderStatus::Completed, OrderStatus::Cancelled]))
        .all(&state.orm)
        .await?;

    let items = assemble_details(&state.orm, orders).await?;

    Ok(ApiResponse::success(
        "Active orders",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders_by_status(
    state: &AppState,
    user: &AuthUser,
    status: OrderStatus,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(scope.restaurant_id))
        .filter(OrderCol::Status.eq(status))
        .all(&state.orm)
        .await?;

    let items = assemble_details(&state.orm, orders).await?;

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

/// Orders placed on one calendar day, `[midnight, next midnight)` in UTC.
pub async fn list_orders_by_day(
    state: &AppState,
    user: &AuthUser,
    date: NaiveDate,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = date
        .checked_add_days(Days::new(1))
        .ok_or(AppError::BadRequest("date out of range".into()))?
        .and_time(NaiveTime::MIN)
        .and_utc();

    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(scope.restaurant_id))
        .filter(OrderCol::OrderDate.gte(start))
        .filter(OrderCol::OrderDate.lt(end))
        .all(&state.orm)
        .await?;

    let items = assemble_details(&state.orm, orders).await?;

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetails>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(order.restaurant_id)?;

    let mut details = assemble_details(&state.orm, vec![order]).await?;
    // assemble_details preserves its input, so one order in, one out
    let details = details
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order details missing")))?;

    Ok(ApiResponse::success("Order", details, None))
}

/// Creates the order and its lines in one transaction. Prices are read
/// from the menu under lock and copied onto the lines; the stored total
/// is their sum and never recomputed afterwards.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDetails>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    if payload.items.is_empty() {
        return Err(AppError::BadRequest("order must contain at least one item".into()));
    }
    if payload.items.iter().any(|i| i.quantity <= 0) {
        return Err(AppError::BadRequest("quantities must be positive".into()));
    }

    let txn = state.orm.begin().await?;

    let table = Tables::find_by_id(payload.table_id)
        .filter(TableCol::IsActive.eq(true))
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(table.restaurant_id)?;

    let mut total = Decimal::ZERO;
    let order_id = Uuid::new_v4();
    let mut lines = Vec::with_capacity(payload.items.len());

    for item in &payload.items {
        let menu_item = MenuItems::find_by_id(item.menu_item_id)
            .filter(MenuItemCol::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        scope.authorize(menu_item.restaurant_id)?;

        total += menu_item.price * Decimal::from(item.quantity);
        lines.push(OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            menu_item_id: Set(menu_item.id),
            quantity: Set(item.quantity),
            unit_price: Set(menu_item.price),
        });
    }

    if total <= Decimal::ZERO {
        return Err(AppError::BadRequest("order total must be positive".into()));
    }

    let order = OrderActive {
        id: Set(order_id),
        restaurant_id: Set(scope.restaurant_id),
        table_id: Set(table.id),
        employee_id: Set(scope.employee_id),
        order_number: Set(random_order_number()),
        status: Set(OrderStatus::Pending),
        order_date: Set(Utc::now().into()),
        total_amount: Set(total),
        shipping_address: Set(payload.shipping_address),
    }
    .insert(&txn)
    .await?;

    for line in lines {
        line.insert(&txn).await?;
    }

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::OrderChanged).await;

    let mut details = assemble_details(&state.orm, vec![order]).await?;
    let details = details
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order details missing")))?;

    Ok(ApiResponse::success(
        "Order created",
        details,
        Some(Meta::empty()),
    ))
}

/// Moves the order along the lifecycle. Illegal transitions are rejected
/// before anything is written; cancelling frees the table when no other
/// open order still sits on it.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderDetails>> {
    ensure_any_role(user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(order.restaurant_id)?;

    if !order.status.can_transition(payload.status) {
        return Err(AppError::Conflict(format!(
            "cannot move order from {} to {}",
            order.status, payload.status
        )));
    }

    let table_id = order.table_id;
    let mut active: OrderActive = order.into();
    active.status = Set(payload.status);
    let order = active.update(&txn).await?;

    if payload.status == OrderStatus::Cancelled {
        release_table_if_free(&txn, table_id).await?;
    }

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::OrderChanged).await;

    let mut details = assemble_details(&state.orm, vec![order]).await?;
    let details = details
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order details missing")))?;

    Ok(ApiResponse::success(
        "Order status updated",
        details,
        Some(Meta::empty()),
    ))
}

fn random_order_number() -> i32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}

/// Puts the table back to Available unless some other order on it is
/// still open. Caller holds the transaction.
pub(crate) async fn release_table_if_free<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
) -> AppResult<()> {
    let open = Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .filter(OrderCol::Status.is_not_in([OrderStatus::Completed, OrderStatus::Cancelled]))
        .count(conn)
        .await?;
    if open > 0 {
        return Ok(());
    }

    let Some(table) = Tables::find_by_id(table_id).one(conn).await? else {
        return Ok(());
    };
    if table.status == TableStatus::Available {
        return Ok(());
    }

    let mut active: TableActive = table.into();
    active.status = Set(TableStatus::Available);
    active.update(conn).await?;
    Ok(())
}

/// Joins lines, menu item names and table numbers onto a batch of orders
/// without per-order queries. Output order matches input order.
pub(crate) async fn assemble_details<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderDetails>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let lines: Vec<OrderItemModel> = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .all(conn)
        .await?;

    let menu_item_ids: Vec<Uuid> = lines.iter().map(|l| l.menu_item_id).collect();
    let names: HashMap<Uuid, String> = MenuItems::find()
        .filter(MenuItemCol::Id.is_in(menu_item_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let table_ids: Vec<Uuid> = orders.iter().map(|o| o.table_id).collect();
    let table_numbers: HashMap<Uuid, i32> = Tables::find()
        .filter(TableCol::Id.is_in(table_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.id, t.number))
        .collect();

    let mut lines_by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        lines_by_order
            .entry(line.order_id)
            .or_default()
            .push(OrderLine {
                menu_item_name: names
                    .get(&line.menu_item_id)
                    .cloned()
                    .unwrap_or_default(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderDetails {
            id: order.id,
            restaurant_id: order.restaurant_id,
            table_id: order.table_id,
            employee_id: order.employee_id,
            table_number: table_numbers.get(&order.table_id).copied().unwrap_or(0),
            order_number: order.order_number,
            status: order.status,
            order_date: order.order_date.with_timezone(&Utc),
            total_amount: order.total_amount,
            shipping_address: order.shipping_address,
            items: lines_by_order.remove(&order.id).unwrap_or_default(),
        })
        .collect())
}
