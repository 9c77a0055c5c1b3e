use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::{OrderStatus, RoleName},
    dto::payments::{CreatePaymentRequest, PaymentList},
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel,
        },
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, ensure_any_role},
    models::Payment,
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

/// Settles an order: writes the payment row for the order's frozen total,
/// marks the order Completed and frees its table, all in one transaction.
/// The amount is never taken from the client.
pub async fn make_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    ensure_any_role(user, &[RoleName::Manager, RoleName::Cashier])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(payload.order_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(order.restaurant_id)?;

    if order.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "order is already {}",
            order.status
        )));
    }
    if order.total_amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("order total must be positive".into()));
    }

    let already_paid = Payments::find()
        .filter(PaymentCol::OrderId.eq(order.id))
        .one(&txn)
        .await?
        .is_some();
    if already_paid {
        return Err(AppError::Conflict("order is already paid".into()));
    }

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        amount: Set(order.total_amount),
        payment_method: Set(payload.payment_method),
        payment_date: Set(Utc::now().into()),
        status: Set("Success".to_owned()),
    }
    .insert(&txn)
    .await?;

    let table_id = order.table_id;
    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Completed);
    active.update(&txn).await?;

    order_service::release_table_if_free(&txn, table_id).await?;

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::PaymentRecorded).await;
    events::publish(state, scope.restaurant_id, DomainEvent::OrderChanged).await;
    events::publish(state, scope.restaurant_id, DomainEvent::TableChanged).await;

    Ok(ApiResponse::success(
        "Payment recorded",
        payment_from_entity(payment),
        Some(Meta::empty()),
    ))
}

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PaymentList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let order_ids: Vec<Uuid> = Orders::find()
        .filter(OrderCol::RestaurantId.eq(scope.restaurant_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();

    let items = Payments::find()
        .filter(PaymentCol::OrderId.is_in(order_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Payments",
        PaymentList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let payment = Payments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let order = Orders::find_by_id(payment.order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(order.restaurant_id)?;

    Ok(ApiResponse::success(
        "Payment",
        payment_from_entity(payment),
        None,
    ))
}

pub async fn get_payment_for_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(order.restaurant_id)?;

    let payment = Payments::find()
        .filter(PaymentCol::OrderId.eq(order_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Payment",
        payment_from_entity(payment),
        None,
    ))
}

fn payment_from_entity(model: PaymentModel) -> Payment {
    Payment {
        id: model.id,
        order_id: model.order_id,
        amount: model.amount,
        payment_method: model.payment_method,
        payment_date: model.payment_date.with_timezone(&Utc),
        status: model.status,
    }
}
