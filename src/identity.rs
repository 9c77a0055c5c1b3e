//! Tenant scope resolution: every restaurant-scoped operation derives "my
//! restaurant" from the caller's employee profile, never from client input.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::employees::{Column as EmployeeCol, Entity as Employees},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
};

#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub user_id: Uuid,
    pub employee_id: Uuid,
    pub restaurant_id: Uuid,
}

impl Scope {
    /// Restaurant mismatch is an authorization failure, not a not-found.
    pub fn authorize(&self, restaurant_id: Uuid) -> AppResult<()> {
        if self.restaurant_id == restaurant_id {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn resolve_scope<C: ConnectionTrait>(conn: &C, user: &AuthUser) -> AppResult<Scope> {
    let employee = Employees::find()
        .filter(EmployeeCol::UserId.eq(user.user_id))
        .filter(EmployeeCol::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Scope {
        user_id: user.user_id,
        employee_id: employee.id,
        restaurant_id: employee.restaurant_id,
    })
}
