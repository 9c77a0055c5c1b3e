mod common;

use restaurant_management_api::{
    domain::{RoleName, TableStatus},
    dto::{
        categories::CreateCategoryRequest,
        tables::{CreateTableRequest, UpdateTableStatusRequest},
    },
    error::AppError,
    services::{category_service, menu_item_service, table_service},
};
use rust_decimal::Decimal;

use restaurant_management_api::dto::menu_items::CreateMenuItemRequest;

// Table numbers are unique among active tables only; retiring a table
// frees its number for reuse.
#[tokio::test]
async fn table_numbers_are_unique_until_retired() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Numbered Nook").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 12,
            capacity: 4,
        },
    )
    .await?
    .data
    .unwrap();

    let err = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 12,
            capacity: 2,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    table_service::delete_table(&state, &manager, table.id).await?;

    // the number is free again
    table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 12,
            capacity: 6,
        },
    )
    .await?;

    // the retired table no longer resolves
    let err = table_service::get_table(&state, &manager, table.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");

    Ok(())
}

#[tokio::test]
async fn deleting_a_category_deactivates_its_menu_items() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Cascade Canteen").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let category = category_service::create_category(
        &state,
        &manager,
        CreateCategoryRequest {
            name: "Desserts".into(),
            description: "Sweet things".into(),
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
            name: "Tiramisu".into(),
            description: "Classic".into(),
            price: Decimal::new(6_50, 2),
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();

    category_service::delete_category(&state, &manager, category.id).await?;

    let err = menu_item_service::get_menu_item(&state, &manager, menu_item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");

    let err = category_service::get_category(&state, &manager, category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");

    Ok(())
}

#[tokio::test]
async fn table_counts_follow_the_status_filter() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Counting House").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let mut first = None;
    for number in 1..=3 {
        let table = table_service::create_table(
            &state,
            &manager,
            CreateTableRequest {
                number,
                capacity: 2,
            },
        )
        .await?
        .data
        .unwrap();
        first.get_or_insert(table.id);
    }
    let occupied_id = first.unwrap();

    table_service::update_table_status(
        &state,
        &manager,
        occupied_id,
        UpdateTableStatusRequest {
            status: TableStatus::Occupied,
        },
    )
    .await?;

    let all = table_service::count_tables(&state, &manager, None)
        .await?
        .data
        .unwrap();
    assert_eq!(all.count, 3);

    let available = table_service::count_tables(&state, &manager, Some(TableStatus::Available))
        .await?
        .data
        .unwrap();
    assert_eq!(available.count, 2);

    let occupied = table_service::list_tables_by_status(&state, &manager, TableStatus::Occupied)
        .await?
        .data
        .unwrap();
    assert_eq!(occupied.items.len(), 1);
    assert_eq!(occupied.items[0].id, occupied_id);

    Ok(())
}

#[tokio::test]
async fn role_and_tenant_gates_hold() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_a = common::seed_restaurant(&state, "Tenant A").await?;
    let restaurant_b = common::seed_restaurant(&state, "Tenant B").await?;
    let manager_a = common::seed_staff(&state, restaurant_a, &[RoleName::Manager]).await?;
    let waiter_a = common::seed_staff(&state, restaurant_a, &[RoleName::Waiter]).await?;
    let manager_b = common::seed_staff(&state, restaurant_b, &[RoleName::Manager]).await?;

    // waiters read the floor but do not shape the catalog
    let err = category_service::create_category(
        &state,
        &waiter_a,
        CreateCategoryRequest {
            name: "Nope".into(),
            description: "Not allowed".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");

    // a table in restaurant A is invisible to restaurant B's manager
    let table = table_service::create_table(
        &state,
        &manager_a,
        CreateTableRequest {
            number: 3,
            capacity: 2,
        },
    )
    .await?
    .data
    .unwrap();

    let err = table_service::get_table(&state, &manager_b, table.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized), "{err:?}");

    Ok(())
}
