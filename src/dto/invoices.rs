use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceLine {
    pub item_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceDetails {
    pub id: Uuid,
    pub order_id: Uuid,
    pub order_number: i32,
    pub issued_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub items: Vec<InvoiceLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceList {
    pub items: Vec<InvoiceDetails>,
}
