use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{domain::RoleName, models::Role};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoleRequest {
    pub user_id: Uuid,
    pub name: RoleName,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub name: RoleName,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleList {
    pub items: Vec<Role>,
}
