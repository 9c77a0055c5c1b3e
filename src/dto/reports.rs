use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SalesReportRequest {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Computed on demand, never persisted.
#[derive(Debug, Serialize, ToSchema)]
pub struct SalesReport {
    pub report_date: DateTime<Utc>,
    pub total_sales: Decimal,
    pub total_orders: i64,
    pub average_order_value: Decimal,
}
