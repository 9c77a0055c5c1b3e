mod common;

use restaurant_management_api::{
    domain::{OrderStatus, PaymentMethod, RoleName, TableStatus},
    dto::{
        categories::CreateCategoryRequest,
        menu_items::{CreateMenuItemRequest, UpdatePriceRequest},
        orders::{CreateOrderItemRequest, CreateOrderRequest, UpdateOrderStatusRequest},
        payments::CreatePaymentRequest,
        tables::{CreateTableRequest, UpdateTableStatusRequest},
    },
    error::AppError,
    services::{
        category_service, invoice_service, menu_item_service, order_service, payment_service,
        table_service,
    },
};
use chrono::Utc;
use rust_decimal::Decimal;

// Full lifecycle: order on a table -> kitchen states -> payment settles it,
// with frozen prices and the occupied-table guard checked along the way.
#[tokio::test]
async fn order_lifecycle_with_payment_and_invoice() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Lifecycle Bistro").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let category = category_service::create_category(
        &state,
        &manager,
        CreateCategoryRequest {
            name: "Mains".into(),
            description: "Main courses".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let menu_item = menu_item_service::create_menu_item(
        &state,
        &manager,
        CreateMenuItemRequest {
            category_id: category.id,
            name: "Risotto".into(),
            description: "Mushroom risotto".into(),
            price: Decimal::new(12_50, 2),
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 7,
            capacity: 4,
        },
    )
    .await?
    .data
    .unwrap();

    let order = order_service::create_order(
        &state,
        &manager,
        CreateOrderRequest {
            table_id: table.id,
            shipping_address: None,
            items: vec![CreateOrderItemRequest {
                menu_item_id: menu_item.id,
                quantity: 2,
            }],
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, Decimal::new(25_00, 2));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].unit_price, Decimal::new(12_50, 2));

    // seat the guests
    table_service::update_table_status(
        &state,
        &manager,
        table.id,
        UpdateTableStatusRequest {
            status: TableStatus::Occupied,
        },
    )
    .await?;

    // freeing the table while its order is open must fail
    let err = table_service::update_table_status(
        &state,
        &manager,
        table.id,
        UpdateTableStatusRequest {
            status: TableStatus::Available,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // a later menu price change must not touch the stored order
    menu_item_service::update_menu_item_price(
        &state,
        &manager,
        menu_item.id,
        UpdatePriceRequest {
            price: Decimal::new(99_00, 2),
        },
    )
    .await?;

    let refetched = order_service::get_order(&state, &manager, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(refetched.total_amount, Decimal::new(25_00, 2));
    assert_eq!(refetched.items[0].unit_price, Decimal::new(12_50, 2));

    // kitchen progression
    for status in [OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Served] {
        let updated = order_service::update_order_status(
            &state,
            &manager,
            order.id,
            UpdateOrderStatusRequest { status },
        )
        .await?
        .data
        .unwrap();
        assert_eq!(updated.status, status);
    }

    // no going backwards
    let err = order_service::update_order_status(
        &state,
        &manager,
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Preparing,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // payment settles the order at its frozen total
    let payment = payment_service::make_payment(
        &state,
        &manager,
        CreatePaymentRequest {
            order_id: order.id,
            payment_method: PaymentMethod::Card,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(payment.amount, Decimal::new(25_00, 2));
    assert_eq!(payment.status, "Success");

    let settled = order_service::get_order(&state, &manager, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(settled.status, OrderStatus::Completed);

    let freed = table_service::get_table(&state, &manager, table.id)
        .await?
        .data
        .unwrap();
    assert_eq!(freed.status, TableStatus::Available);

    // terminal orders admit no further transitions
    let err = order_service::update_order_status(
        &state,
        &manager,
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // invoice snapshots the frozen lines, once per order
    let invoice = invoice_service::generate_invoice(&state, &manager, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(invoice.total_amount, Decimal::new(25_00, 2));
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.items[0].unit_price, Decimal::new(12_50, 2));
    assert_eq!(invoice.items[0].line_total, Decimal::new(25_00, 2));

    let err = invoice_service::generate_invoice(&state, &manager, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // the settled order shows up in the status and day queries
    let completed = order_service::list_orders_by_status(&state, &manager, OrderStatus::Completed)
        .await?
        .data
        .unwrap();
    assert!(completed.items.iter().any(|o| o.id == order.id));

    let today = order_service::list_orders_by_day(&state, &manager, Utc::now().date_naive())
        .await?
        .data
        .unwrap();
    assert!(today.items.iter().any(|o| o.id == order.id));

    let fetched = payment_service::get_payment(&state, &manager, payment.id)
        .await?
        .data
        .unwrap();
    assert_eq!(fetched.order_id, order.id);

    let invoices = invoice_service::list_invoices(&state, &manager)
        .await?
        .data
        .unwrap();
    assert!(invoices.items.iter().any(|i| i.id == invoice.id));

    Ok(())
}

#[tokio::test]
async fn cancelling_an_order_frees_its_table() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Cancel Cafe").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let category = category_service::create_category(
        &state,
        &manager,
        CreateCategoryRequest {
            name: "Drinks".into(),
            description: "Beverages".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let menu_item = menu_item_service::create_menu_item(
        &state,
        &manager,
        CreateMenuItemRequest {
            category_id: category.id,
            name: "Espresso".into(),
            description: "Double shot".into(),
            price: Decimal::new(3_00, 2),
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 2,
            capacity: 2,
        },
    )
    .await?
    .data
    .unwrap();

    let order = order_service::create_order(
        &state,
        &manager,
        CreateOrderRequest {
            table_id: table.id,
            shipping_address: None,
            items: vec![CreateOrderItemRequest {
                menu_item_id: menu_item.id,
                quantity: 1,
            }],
        },
    )
    .await?
    .data
    .unwrap();

    table_service::update_table_status(
        &state,
        &manager,
        table.id,
        UpdateTableStatusRequest {
            status: TableStatus::Occupied,
        },
    )
    .await?;

    order_service::update_order_status(
        &state,
        &manager,
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
        },
    )
    .await?;

    let freed = table_service::get_table(&state, &manager, table.id)
        .await?
        .data
        .unwrap();
    assert_eq!(freed.status, TableStatus::Available);

    Ok(())
}

#[tokio::test]
async fn empty_orders_are_rejected() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Empty Order Diner").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 1,
            capacity: 2,
        },
    )
    .await?
    .data
    .unwrap();

    let err = order_service::create_order(
        &state,
        &manager,
        CreateOrderRequest {
            table_id: table.id,
            shipping_address: None,
            items: vec![],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    Ok(())
}
