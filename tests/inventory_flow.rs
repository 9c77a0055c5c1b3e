mod common;

use restaurant_management_api::{
    domain::RoleName,
    dto::inventory::{
        CreateInventoryItemRequest, CreateInventoryTransactionRequest, UpdateStockLevelRequest,
    },
    error::AppError,
    services::inventory_service,
};
use rust_decimal::Decimal;

// Stock counts are direct overwrites; the low-stock view tracks them.
#[tokio::test]
async fn stock_counts_drive_the_low_stock_view() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Stocked Storeroom").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let flour = inventory_service::create_inventory_item(
        &state,
        &manager,
        CreateInventoryItemRequest {
            name: "Flour".into(),
            stock_level: 40,
            minimum_stock_level: 10,
            unit: 1,
            cost: Decimal::new(2_30, 2),
        },
    )
    .await?
    .data
    .unwrap();

    let low = inventory_service::list_low_stock_items(&state, &manager)
        .await?
        .data
        .unwrap();
    assert!(low.items.iter().all(|i| i.id != flour.id));

    // a recount at the minimum puts the item on the low-stock list
    let counted = inventory_service::update_stock_level(
        &state,
        &manager,
        flour.id,
        UpdateStockLevelRequest { stock_level: 10 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(counted.stock_level, 10);

    let low = inventory_service::list_low_stock_items(&state, &manager)
        .await?
        .data
        .unwrap();
    assert!(low.items.iter().any(|i| i.id == flour.id));

    let err = inventory_service::update_stock_level(
        &state,
        &manager,
        flour.id,
        UpdateStockLevelRequest { stock_level: -1 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    Ok(())
}

// Movements are an audit trail: recorded against the calling employee,
// never applied to the counted stock.
#[tokio::test]
async fn movements_audit_without_touching_stock() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Audit Pantry").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let rice = inventory_service::create_inventory_item(
        &state,
        &manager,
        CreateInventoryItemRequest {
            name: "Rice".into(),
            stock_level: 25,
            minimum_stock_level: 5,
            unit: 1,
            cost: Decimal::new(1_80, 2),
        },
    )
    .await?
    .data
    .unwrap();

    let err = inventory_service::create_inventory_transaction(
        &state,
        &manager,
        CreateInventoryTransactionRequest {
            inventory_item_id: rice.id,
            quantity_changed: 0,
            reason: "nothing moved".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    let movement = inventory_service::create_inventory_transaction(
        &state,
        &manager,
        CreateInventoryTransactionRequest {
            inventory_item_id: rice.id,
            quantity_changed: -3,
            reason: "spoilage".into(),
        },
    )
    .await?
    .data
    .unwrap();

    // the counted stock is untouched
    let item = inventory_service::get_inventory_item(&state, &manager, rice.id)
        .await?
        .data
        .unwrap();
    assert_eq!(item.stock_level, 25);

    let by_item = inventory_service::list_item_transactions(&state, &manager, rice.id)
        .await?
        .data
        .unwrap();
    assert_eq!(by_item.items.len(), 1);
    assert_eq!(by_item.items[0].quantity_changed, -3);

    let by_employee =
        inventory_service::list_employee_transactions(&state, &manager, movement.employee_id)
            .await?
            .data
            .unwrap();
    assert!(by_employee.items.iter().any(|t| t.id == movement.id));

    let all = inventory_service::list_transactions(&state, &manager)
        .await?
        .data
        .unwrap();
    assert!(all.items.iter().any(|t| t.id == movement.id));

    inventory_service::delete_inventory_transaction(&state, &manager, movement.id).await?;
    let by_item = inventory_service::list_item_transactions(&state, &manager, rice.id)
        .await?
        .data
        .unwrap();
    assert!(by_item.items.is_empty());

    Ok(())
}
