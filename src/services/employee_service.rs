use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    domain::RoleName,
    dto::employees::{CreateEmployeeRequest, EmployeeList, UpdateEmployeeRequest},
    entity::{
        employees::{
            ActiveModel as EmployeeActive, Column as EmployeeCol, Entity as Employees,
            Model as EmployeeModel,
        },
        restaurants::Entity as Restaurants,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    events::{self, DomainEvent},
    identity,
    middleware::auth::{AuthUser, ensure_any_role},
    models::Employee,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Admins manage staff across restaurants; managers only within their
/// own. Both go through this check.
async fn managed_restaurant(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
) -> AppResult<()> {
    if user.has_role(RoleName::Admin) {
        return Ok(());
    }
    match identity::resolve_scope(&state.orm, user).await {
        Ok(scope) => scope.authorize(restaurant_id),
        // a manager without an employee record yet has no tenant to clash with
        Err(AppError::NotFound) => Ok(()),
        Err(err) => Err(err),
    }
}

pub async fn list_employees(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<EmployeeList>> {
    ensure_any_role(user, &[RoleName::Manager, RoleName::Admin])?;
    managed_restaurant(state, user, restaurant_id).await?;

    let items = Employees::find()
        .filter(EmployeeCol::RestaurantId.eq(restaurant_id))
        .filter(EmployeeCol::IsActive.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(employee_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Employees",
        EmployeeList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_employee(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Employee>> {
    ensure_any_role(user, &[RoleName::Manager, RoleName::Admin])?;

    let employee = Employees::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    managed_restaurant(state, user, employee.restaurant_id).await?;

    Ok(ApiResponse::success(
        "Employee",
        employee_from_entity(employee),
        None,
    ))
}

/// Enrolls a user as staff. A user holds at most one employee record at
/// a time, active or not.
pub async fn create_employee(
    state: &AppState,
    user: &AuthUser,
    payload: CreateEmployeeRequest,
) -> AppResult<ApiResponse<Employee>> {
    ensure_any_role(user, &[RoleName::Manager, RoleName::Admin])?;
    managed_restaurant(state, user, payload.restaurant_id).await?;

    if payload.salary < Decimal::ZERO {
        return Err(AppError::BadRequest("salary must not be negative".into()));
    }

    Users::find_by_id(payload.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Restaurants::find_by_id(payload.restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let taken = Employees::find()
        .filter(EmployeeCol::UserId.eq(payload.user_id))
        .one(&state.orm)
        .await?
        .is_some();
    if taken {
        return Err(AppError::Conflict("user is already an employee".into()));
    }

    let employee = EmployeeActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        restaurant_id: Set(payload.restaurant_id),
        salary: Set(payload.salary),
        hire_date: Set(payload.hire_date.into()),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    events::publish(state, employee.restaurant_id, DomainEvent::EmployeeChanged).await;

    Ok(ApiResponse::success(
        "Employee created",
        employee_from_entity(employee),
        Some(Meta::empty()),
    ))
}

/// Salary changes and deactivation. Deactivating cuts the user's tenant
/// scope; their token still parses but scoped calls start failing.
pub async fn update_employee(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateEmployeeRequest,
) -> AppResult<ApiResponse<Employee>> {
    ensure_any_role(user, &[RoleName::Manager, RoleName::Admin])?;

    let existing = Employees::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    managed_restaurant(state, user, existing.restaurant_id).await?;

    let salary = payload.salary.unwrap_or(existing.salary);
    if salary < Decimal::ZERO {
        return Err(AppError::BadRequest("salary must not be negative".into()));
    }
    let is_active = payload.is_active.unwrap_or(existing.is_active);

    let restaurant_id = existing.restaurant_id;
    let mut active: EmployeeActive = existing.into();
    active.salary = Set(salary);
    active.is_active = Set(is_active);
    let employee = active.update(&state.orm).await?;

    events::publish(state, restaurant_id, DomainEvent::EmployeeChanged).await;

    Ok(ApiResponse::success(
        "Employee updated",
        employee_from_entity(employee),
        Some(Meta::empty()),
    ))
}

/// Soft delete; the row stays for payroll history and the user may be
/// re-enrolled elsewhere later by reactivating it.
pub async fn delete_employee(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_any_role(user, &[RoleName::Manager, RoleName::Admin])?;

    let existing = Employees::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    managed_restaurant(state, user, existing.restaurant_id).await?;

    let restaurant_id = existing.restaurant_id;
    let mut active: EmployeeActive = existing.into();
    active.is_active = Set(false);
    active.update(&state.orm).await?;

    events::publish(state, restaurant_id, DomainEvent::EmployeeChanged).await;

    Ok(ApiResponse::success(
        "Employee removed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn employee_from_entity(model: EmployeeModel) -> Employee {
    Employee {
        id: model.id,
        user_id: model.user_id,
        restaurant_id: model.restaurant_id,
        salary: model.salary,
        hire_date: model.hire_date.with_timezone(&Utc),
        is_active: model.is_active,
    }
}
