use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::{OrderStatus, ReservationStatus, RoleName, TableStatus},
    dto::reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        reservations::{
            ActiveModel as ReservationActive, Column as ReservationCol, Entity as Reservations,
            Model as ReservationModel,
        },
        tables::{ActiveModel as TableActive, Column as TableCol, Entity as Tables},
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, ensure_any_role},
    models::Reservation,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReservationList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let items = Reservations::find()
        .filter(ReservationCol::RestaurantId.eq(scope.restaurant_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(reservation_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { items },
        Some(Meta::empty()),
    ))
}

/// Case-insensitive substring match on the guest's name.
pub async fn search_reservations(
    state: &AppState,
    user: &AuthUser,
    customer_name: &str,
) -> AppResult<ApiResponse<ReservationList>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let pattern = format!("%{}%", customer_name.trim());
    let items = Reservations::find()
        .filter(ReservationCol::RestaurantId.eq(scope.restaurant_id))
        .filter(Expr::col(ReservationCol::CustomerName).ilike(pattern))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(reservation_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let reservation = Reservations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(reservation.restaurant_id)?;

    Ok(ApiResponse::success(
        "Reservation",
        reservation_from_entity(reservation),
        None,
    ))
}

/// Books a table for an exact timestamp. Two live reservations on the
/// same table at the same instant collide; the booked table is flipped
/// to Reserved inside the same transaction.
pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;
    validate_fields(&payload.customer_name, &payload.customer_contact, payload.number_of_guests)?;

    let txn = state.orm.begin().await?;

    let table = Tables::find_by_id(payload.table_id)
        .filter(TableCol::IsActive.eq(true))
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(table.restaurant_id)?;

    ensure_slot_free(&txn, table.id, payload.reservation_time, None).await?;

    let reservation = ReservationActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(scope.restaurant_id),
        table_id: Set(table.id),
        customer_name: Set(payload.customer_name),
        customer_contact: Set(payload.customer_contact),
        reservation_time: Set(payload.reservation_time.into()),
        created_at: Set(Utc::now().into()),
        number_of_guests: Set(payload.number_of_guests),
        status: Set(ReservationStatus::Pending),
        special_requests: Set(payload.special_requests),
    }
    .insert(&txn)
    .await?;

    let mut table_active: TableActive = table.into();
    table_active.status = Set(TableStatus::Reserved);
    table_active.update(&txn).await?;

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::ReservationChanged).await;
    events::publish(state, scope.restaurant_id, DomainEvent::TableChanged).await;

    Ok(ApiResponse::success(
        "Reservation created",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

pub async fn update_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    if payload.number_of_guests <= 0 {
        return Err(AppError::BadRequest("guest count must be positive".into()));
    }

    let txn = state.orm.begin().await?;

    let existing = Reservations::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    if existing.status == ReservationStatus::Cancelled {
        return Err(AppError::Conflict("reservation is cancelled".into()));
    }

    let new_time: DateTime<Utc> = payload.reservation_time;
    if new_time != existing.reservation_time.with_timezone(&Utc) {
        ensure_slot_free(&txn, existing.table_id, new_time, Some(id)).await?;
    }

    let table_id = existing.table_id;
    let cancelling = payload.status == ReservationStatus::Cancelled;

    let mut active: ReservationActive = existing.into();
    active.reservation_time = Set(new_time.into());
    active.number_of_guests = Set(payload.number_of_guests);
    active.special_requests = Set(payload.special_requests);
    active.status = Set(payload.status);
    let reservation = active.update(&txn).await?;

    if cancelling {
        release_table_if_unheld(&txn, table_id).await?;
    }

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::ReservationChanged).await;

    Ok(ApiResponse::success(
        "Reservation updated",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

/// Cancels the reservation and puts its table back to Available unless
/// another live reservation or an open order still holds it.
pub async fn cancel_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    let txn = state.orm.begin().await?;

    let existing = Reservations::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.authorize(existing.restaurant_id)?;

    if existing.status == ReservationStatus::Cancelled {
        return Err(AppError::Conflict("reservation is already cancelled".into()));
    }

    let table_id = existing.table_id;
    let mut active: ReservationActive = existing.into();
    active.status = Set(ReservationStatus::Cancelled);
    let reservation = active.update(&txn).await?;

    release_table_if_unheld(&txn, table_id).await?;

    txn.commit().await?;

    events::publish(state, scope.restaurant_id, DomainEvent::ReservationChanged).await;
    events::publish(state, scope.restaurant_id, DomainEvent::TableChanged).await;

    Ok(ApiResponse::success(
        "Reservation cancelled",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

/// Collision rule: same table, same exact timestamp, reservation not
/// Cancelled.
async fn ensure_slot_free<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    time: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    let mut query = Reservations::find()
        .filter(ReservationCol::TableId.eq(table_id))
        .filter(ReservationCol::ReservationTime.eq(time))
        .filter(ReservationCol::Status.ne(ReservationStatus::Cancelled));
    if let Some(id) = exclude {
        query = query.filter(ReservationCol::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        return Err(AppError::Conflict(
            "table is already reserved for that time".into(),
        ));
    }
    Ok(())
}

async fn release_table_if_unheld<C: ConnectionTrait>(conn: &C, table_id: Uuid) -> AppResult<()> {
    let live_reservations = Reservations::find()
        .filter(ReservationCol::TableId.eq(table_id))
        .filter(
            ReservationCol::Status
                .is_in([ReservationStatus::Pending, ReservationStatus::Confirmed]),
        )
        .count(conn)
        .await?;
    if live_reservations > 0 {
        return Ok(());
    }

    let open_orders = Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .filter(OrderCol::Status.is_not_in([OrderStatus::Completed, OrderStatus::Cancelled]))
        .count(conn)
        .await?;
    if open_orders > 0 {
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

fn validate_fields(name: &str, contact: &str, guests: i32) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("customer name must not be empty".into()));
    }
    if contact.trim().is_empty() {
        return Err(AppError::BadRequest("customer contact must not be empty".into()));
    }
    if guests <= 0 {
        return Err(AppError::BadRequest("guest count must be positive".into()));
    }
    Ok(())
}

fn reservation_from_entity(model: ReservationModel) -> Reservation {
    Reservation {
        id: model.id,
        restaurant_id: model.restaurant_id,
        table_id: model.table_id,
        customer_name: model.customer_name,
        customer_contact: model.customer_contact,
        reservation_time: model.reservation_time.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
        number_of_guests: model.number_of_guests,
        status: model.status,
        special_requests: model.special_requests,
    }
}
