use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{InventoryItem, InventoryTransaction};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInventoryItemRequest {
    pub name: String,
    pub stock_level: i32,
    pub minimum_stock_level: i32,
    pub unit: i32,
    pub cost: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInventoryItemRequest {
    pub name: Option<String>,
    pub minimum_stock_level: Option<i32>,
    pub unit: Option<i32>,
    pub cost: Option<Decimal>,
}

/// Direct overwrite of the stock level, not a delta.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStockLevelRequest {
    pub stock_level: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInventoryTransactionRequest {
    pub inventory_item_id: Uuid,
    pub quantity_changed: i32,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryItemList {
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryTransactionList {
    pub items: Vec<InventoryTransaction>,
}
