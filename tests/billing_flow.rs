mod common;

use chrono::{Duration, Utc};
use restaurant_management_api::{
    domain::{OrderStatus, PaymentMethod, RoleName},
    dto::{
        payments::CreatePaymentRequest,
        reports::SalesReportRequest,
        tables::CreateTableRequest,
    },
    error::AppError,
    services::{payment_service, report_service, table_service},
};
use restaurant_management_api::entity::{
    orders::ActiveModel as OrderActive,
    payments::{Column as PaymentCol, Entity as Payments},
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

// A zero-total order cannot be settled, and the refused attempt must not
// leave a payment row behind.
#[tokio::test]
async fn zero_total_orders_cannot_be_paid() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Zero Sum Snackbar").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 5,
            capacity: 2,
        },
    )
    .await?
    .data
    .unwrap();

    // creation rejects empty orders, so a zero-total row can only be
    // seeded directly
    let employee = restaurant_management_api::identity::resolve_scope(&state.orm, &manager).await?;
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant_id),
        table_id: Set(table.id),
        employee_id: Set(employee.employee_id),
        order_number: Set(100_001),
        status: Set(OrderStatus::Pending),
        order_date: Set(Utc::now().into()),
        total_amount: Set(Decimal::ZERO),
        shipping_address: Set(None),
    }
    .insert(&state.orm)
    .await?;

    let err = payment_service::make_payment(
        &state,
        &manager,
        CreatePaymentRequest {
            order_id: order.id,
            payment_method: PaymentMethod::Cash,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    let rows = Payments::find()
        .filter(PaymentCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?;
    assert!(rows.is_empty(), "no payment row may be written");

    Ok(())
}

// A window with no completed sales is a failure, not a zero-filled report.
#[tokio::test]
async fn sales_report_over_an_empty_window_fails() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Quiet Quarter").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let err = report_service::sales_report(
        &state,
        &manager,
        SalesReportRequest {
            start_date: Utc::now() - Duration::days(7),
            end_date: Utc::now(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");

    // inverted window is rejected outright
    let err = report_service::sales_report(
        &state,
        &manager,
        SalesReportRequest {
            start_date: Utc::now(),
            end_date: Utc::now() - Duration::days(7),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    Ok(())
}

// Completed orders inside the window aggregate; those outside stay out.
#[tokio::test]
async fn sales_report_aggregates_completed_orders() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Busy Bistro").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 6,
            capacity: 4,
        },
    )
    .await?
    .data
    .unwrap();

    let scope = restaurant_management_api::identity::resolve_scope(&state.orm, &manager).await?;

    let now = Utc::now();
    let seeds = [
        (Decimal::new(10_00, 2), now - Duration::hours(1)),
        (Decimal::new(30_00, 2), now - Duration::hours(2)),
        // outside the window
        (Decimal::new(500_00, 2), now - Duration::days(30)),
    ];
    for (amount, when) in seeds {
        OrderActive {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(restaurant_id),
            table_id: Set(table.id),
            employee_id: Set(scope.employee_id),
            order_number: Set(100_002),
            status: Set(OrderStatus::Completed),
            order_date: Set(when.into()),
            total_amount: Set(amount),
            shipping_address: Set(None),
        }
        .insert(&state.orm)
        .await?;
    }

    let report = report_service::sales_report(
        &state,
        &manager,
        SalesReportRequest {
            start_date: now - Duration::days(1),
            end_date: now + Duration::minutes(1),
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(report.total_orders, 2);
    assert_eq!(report.total_sales, Decimal::new(40_00, 2));
    assert_eq!(report.average_order_value, Decimal::new(20_00, 2));

    Ok(())
}
