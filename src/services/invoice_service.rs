use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::RoleName,
    dto::invoices::{InvoiceDetails, InvoiceLine, InvoiceList},
    entity::{
        invoice_items::{
            ActiveModel as InvoiceItemActive, Column as InvoiceItemCol, Entity as InvoiceItems,
            Model as InvoiceItemModel,
        },
        invoices::{
            ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices,
            Model as InvoiceModel,
        },
        menu_items::{Column as MenuItemCol, Entity as MenuItems},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, ensure_any_role},
    response::{ApiResponse, Meta},
    state::AppState,
};

const BILLING: &[RoleName] = &[RoleName::Manager, RoleName::Cashier];

/// Issues the invoice for an order: snapshots the order lines (name,
/// frozen unit price, line total) so the document survives later menu
/// edits. One invoice per order, enforced before insert.
pub async fn generate_invoice(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<InvoiceDetails>> {
    ensure_any_role(user, BILLING)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(order_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(order.restaurant_id)?;

    let existing = Invoices::find()
        .filter(InvoiceCol::OrderId.eq(order_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("order already has an invoice".into()));
    }

    let lines = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .all(&txn)
        .await?;
    if lines.is_empty() {
        return Err(AppError::Conflict("order has no items".into()));
    }

    let menu_item_ids: Vec<Uuid> = lines.iter().map(|l| l.menu_item_id).collect();
    let names: HashMap<Uuid, String> = MenuItems::find()
        .filter(MenuItemCol::Id.is_in(menu_item_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let invoice = InvoiceActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        issued_at: Set(Utc::now().into()),
        total_amount: Set(order.total_amount),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = InvoiceItemActive {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice.id),
            item_name: Set(names.get(&line.menu_item_id).cloned().unwrap_or_default()),
            unit_price: Set(line.unit_price),
            quantity: Set(line.quantity),
            line_total: Set(line.unit_price * Decimal::from(line.quantity)),
        }
        .insert(&txn)
        .await?;
        items.push(item);
    }

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::InvoiceIssued).await;

    Ok(ApiResponse::success(
        "Invoice issued",
        details_from_parts(invoice, order.order_number, items),
        Some(Meta::empty()),
    ))
}

pub async fn get_invoice(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InvoiceDetails>> {
    ensure_any_role(user, BILLING)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let invoice = Invoices::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let order = owning_order(state, &invoice).await?;
    scope.authorize(order.restaurant_id)?;

    let items = InvoiceItems::find()
        .filter(InvoiceItemCol::InvoiceId.eq(invoice.id))
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Invoice",
        details_from_parts(invoice, order.order_number, items),
        None,
    ))
}

pub async fn get_invoice_for_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<InvoiceDetails>> {
    ensure_any_role(user, BILLING)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(order.restaurant_id)?;

    let invoice = Invoices::find()
        .filter(InvoiceCol::OrderId.eq(order_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = InvoiceItems::find()
        .filter(InvoiceItemCol::InvoiceId.eq(invoice.id))
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Invoice",
        details_from_parts(invoice, order.order_number, items),
        None,
    ))
}

pub async fn list_invoices(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<InvoiceList>> {
    ensure_any_role(user, BILLING)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    collect_invoices(state, scope.restaurant_id, None).await
}

/// Invoices issued on a calendar day, keyed on issue time rather than
/// payment time.
pub async fn list_daily_invoices(
    state: &AppState,
    user: &AuthUser,
    date: chrono::NaiveDate,
) -> AppResult<ApiResponse<InvoiceList>> {
    ensure_any_role(user, BILLING)?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let start: DateTime<Utc> = date
        .and_time(NaiveTime::MIN)
        .and_utc();
    let end = start
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::BadRequest("date out of range".into()))?;

    collect_invoices(state, scope.restaurant_id, Some((start, end))).await
}

async fn collect_invoices(
    state: &AppState,
    restaurant_id: Uuid,
    issued_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> AppResult<ApiResponse<InvoiceList>> {
    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(restaurant_id))
        .all(&state.orm)
        .await?;
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let order_numbers: HashMap<Uuid, i32> =
        orders.into_iter().map(|o| (o.id, o.order_number)).collect();

    let mut query = Invoices::find().filter(InvoiceCol::OrderId.is_in(order_ids));
    if let Some((start, end)) = issued_window {
        query = query
            .filter(InvoiceCol::IssuedAt.gte(start))
            .filter(InvoiceCol::IssuedAt.lt(end));
    }
    let invoices = query.all(&state.orm).await?;

    let invoice_ids: Vec<Uuid> = invoices.iter().map(|i| i.id).collect();
    let mut items_by_invoice: HashMap<Uuid, Vec<InvoiceItemModel>> = HashMap::new();
    for item in InvoiceItems::find()
        .filter(InvoiceItemCol::InvoiceId.is_in(invoice_ids))
        .all(&state.orm)
        .await?
    {
        items_by_invoice.entry(item.invoice_id).or_default().push(item);
    }

    let items = invoices
        .into_iter()
        .map(|invoice| {
            let order_number = order_numbers.get(&invoice.order_id).copied().unwrap_or(0);
            let lines = items_by_invoice.remove(&invoice.id).unwrap_or_default();
            details_from_parts(invoice, order_number, lines)
        })
        .collect();

    Ok(ApiResponse::success(
        "Invoices",
        InvoiceList { items },
        Some(Meta::empty()),
    ))
}

async fn owning_order(state: &AppState, invoice: &InvoiceModel) -> AppResult<OrderModel> {
    Orders::find_by_id(invoice.order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

fn details_from_parts(
    invoice: InvoiceModel,
    order_number: i32,
    items: Vec<InvoiceItemModel>,
) -> InvoiceDetails {
    InvoiceDetails {
        id: invoice.id,
        order_id: invoice.order_id,
        order_number,
        issued_at: invoice.issued_at.with_timezone(&Utc),
        total_amount: invoice.total_amount,
        items: items
            .into_iter()
            .map(|i| InvoiceLine {
                item_name: i.item_name,
                unit_price: i.unit_price,
                quantity: i.quantity,
                line_total: i.line_total,
            })
            .collect(),
    }
}
