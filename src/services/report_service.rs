use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    domain::{OrderStatus, RoleName},
    dto::reports::{SalesReport, SalesReportRequest},
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    identity,
    middleware::auth::{AuthUser, ensure_any_role},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Aggregates completed orders over an inclusive window. A window with no
/// completed sales is a failure, not a zero-filled report.
pub async fn sales_report(
    state: &AppState,
    user: &AuthUser,
    payload: SalesReportRequest,
) -> AppResult<ApiResponse<SalesReport>> {
    ensure_any_role(user, &[RoleName::Manager])?;
    let scope = identity::resolve_scope(&state.orm, user).await?;

    if payload.start_date >= payload.end_date {
        return Err(AppError::BadRequest(
            "start date must come before end date".into(),
        ));
    }

    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(scope.restaurant_id))
        .filter(OrderCol::Status.eq(OrderStatus::Completed))
        .filter(OrderCol::OrderDate.gte(payload.start_date))
        .filter(OrderCol::OrderDate.lte(payload.end_date))
        .all(&state.orm)
        .await?;

    if orders.is_empty() {
        return Err(AppError::NotFound);
    }

    let total_orders = orders.len() as i64;
    let total_sales: Decimal = orders.iter().map(|o| o.total_amount).sum();
    let average_order_value = total_sales / Decimal::from(total_orders);

    Ok(ApiResponse::success(
        "Sales report",
        SalesReport {
            report_date: Utc::now(),
            total_sales,
            total_orders,
            average_order_value,
        },
        Some(Meta::empty()),
    ))
}
