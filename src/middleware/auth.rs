use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::RoleName, error::AppError, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

/// The authenticated session, resolved from the bearer token.
/// Token issuance lives outside this service; we only consume it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub roles: Vec<RoleName>,
}

impl AuthUser {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }
}

/// Every on-site role; the read-path gate for catalog, tables and orders.
pub const STAFF: &[RoleName] = &[
    RoleName::Manager,
    RoleName::Waiter,
    RoleName::Kitchen,
    RoleName::Cashier,
];

pub fn ensure_any_role(user: &AuthUser, allowed: &[RoleName]) -> Result<(), AppError> {
    if allowed.iter().any(|r| user.has_role(*r)) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_any_role(user, &[RoleName::Admin])
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized);
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;

        let roles = decoded
            .claims
            .roles
            .iter()
            .map(|r| r.parse::<RoleName>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser { user_id, roles })
    }
}
