use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    domain::RoleName,
    dto::roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    entity::{
        roles::{ActiveModel as RoleActive, Column as RoleCol, Entity as Roles, Model as RoleModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::Role,
    response::{ApiResponse, Meta},
    state::AppState,
};

const ROLE_ADMINS: &[RoleName] = &[RoleName::Manager, RoleName::Admin];

pub async fn list_roles_for_user(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
) -> AppResult<ApiResponse<RoleList>> {
    ensure_any_role(user, ROLE_ADMINS)?;

    let items = Roles::find()
        .filter(RoleCol::UserId.eq(user_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(role_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Roles",
        RoleList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Role>> {
    ensure_any_role(user, ROLE_ADMINS)?;

    let role = Roles::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Role", role_from_entity(role), None))
}

/// Grants a role. Only admins may mint further admins.
pub async fn create_role(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRoleRequest,
) -> AppResult<ApiResponse<Role>> {
    ensure_any_role(user, ROLE_ADMINS)?;
    if payload.name == RoleName::Admin {
        ensure_any_role(user, &[RoleName::Admin])?;
    }

    Users::find_by_id(payload.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let duplicate = Roles::find()
        .filter(RoleCol::UserId.eq(payload.user_id))
        .filter(RoleCol::Name.eq(payload.name))
        .one(&state.orm)
        .await?
        .is_some();
    if duplicate {
        return Err(AppError::Conflict("user already holds that role".into()));
    }

    let role = RoleActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        name: Set(payload.name),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Role granted",
        role_from_entity(role),
        Some(Meta::empty()),
    ))
}

pub async fn update_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<Role>> {
    ensure_any_role(user, ROLE_ADMINS)?;

    let existing = Roles::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    // touching Admin in either direction stays admin-only
    if existing.name == RoleName::Admin || payload.name == RoleName::Admin {
        ensure_any_role(user, &[RoleName::Admin])?;
    }

    let duplicate = Roles::find()
        .filter(RoleCol::UserId.eq(existing.user_id))
        .filter(RoleCol::Name.eq(payload.name))
        .filter(RoleCol::Id.ne(id))
        .one(&state.orm)
        .await?
        .is_some();
    if duplicate {
        return Err(AppError::Conflict("user already holds that role".into()));
    }

    let mut active: RoleActive = existing.into();
    active.name = Set(payload.name);
    let role = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Role updated",
        role_from_entity(role),
        Some(Meta::empty()),
    ))
}

pub async fn delete_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_any_role(user, ROLE_ADMINS)?;

    let existing = Roles::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if existing.name == RoleName::Admin {
        ensure_any_role(user, &[RoleName::Admin])?;
    }

    existing.delete(&state.orm).await?;

    Ok(ApiResponse::success(
        "Role revoked",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn role_from_entity(model: RoleModel) -> Role {
    Role {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
    }
}
