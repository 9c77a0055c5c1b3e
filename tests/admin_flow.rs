mod common;

use chrono::Utc;
use restaurant_management_api::{
    domain::RoleName,
    dto::{
        employees::{CreateEmployeeRequest, UpdateEmployeeRequest},
        restaurants::{CreateRestaurantRequest, UpdateRestaurantRequest},
        roles::CreateRoleRequest,
    },
    error::AppError,
    services::{
        category_service, employee_service, inventory_service, menu_item_service,
        restaurant_service, role_service,
    },
};
use restaurant_management_api::dto::{
    categories::CreateCategoryRequest,
    inventory::{CreateInventoryItemRequest, CreateInventoryTransactionRequest},
    menu_items::CreateMenuItemRequest,
};
use rust_decimal::Decimal;

// Admin provisions a restaurant and staff; managers are boxed into their
// own tenant and cannot mint admins.
#[tokio::test]
async fn admin_provisions_restaurant_and_staff() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let admin = common::seed_user(&state, &[RoleName::Admin]).await?;

    let restaurant = restaurant_service::create_restaurant(
        &state,
        &admin,
        CreateRestaurantRequest {
            name: "New Venture".into(),
            address: "42 Main Street".into(),
            phone: "555-0200".into(),
            email: "venture@example.com".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let updated = restaurant_service::update_restaurant(
        &state,
        &admin,
        restaurant.id,
        UpdateRestaurantRequest {
            name: Some("New Venture & Co".into()),
            address: None,
            phone: None,
            email: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.name, "New Venture & Co");

    // enroll a fresh user as staff
    let recruit = common::seed_user(&state, &[RoleName::User]).await?;
    let employee = employee_service::create_employee(
        &state,
        &admin,
        CreateEmployeeRequest {
            user_id: recruit.user_id,
            restaurant_id: restaurant.id,
            salary: Decimal::new(2_000_00, 2),
            hire_date: Utc::now(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(employee.is_active);

    // same user cannot be enrolled twice
    let err = employee_service::create_employee(
        &state,
        &admin,
        CreateEmployeeRequest {
            user_id: recruit.user_id,
            restaurant_id: restaurant.id,
            salary: Decimal::new(2_000_00, 2),
            hire_date: Utc::now(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // a raise lands
    let employee = employee_service::update_employee(
        &state,
        &admin,
        employee.id,
        UpdateEmployeeRequest {
            salary: Some(Decimal::new(2_200_00, 2)),
            is_active: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(employee.salary, Decimal::new(2_200_00, 2));

    // removal is a soft delete that cuts the recruit's tenant scope
    employee_service::delete_employee(&state, &admin, employee.id).await?;

    let staff_session = restaurant_management_api::middleware::auth::AuthUser {
        user_id: recruit.user_id,
        roles: vec![RoleName::Waiter],
    };
    let err = category_service::list_categories(&state, &staff_session)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");

    // and the roster no longer lists them
    let roster = employee_service::list_employees(&state, &admin, restaurant.id)
        .await?
        .data
        .unwrap();
    assert!(roster.items.iter().all(|e| e.id != employee.id));

    Ok(())
}

#[tokio::test]
async fn restaurants_with_history_resist_deletion() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Sticky Records").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;
    let admin = common::seed_user(&state, &[RoleName::Admin]).await?;

    let category = category_service::create_category(
        &state,
        &manager,
        CreateCategoryRequest {
            name: "Starters".into(),
            description: "Small plates".into(),
        },
    )
    .await?
    .data
    .unwrap();
    menu_item_service::create_menu_item(
        &state,
        &manager,
        CreateMenuItemRequest {
            category_id: category.id,
            name: "Bruschetta".into(),
            description: "Grilled bread".into(),
            price: Decimal::new(5_00, 2),
            image_url: None,
        },
    )
    .await?;

    let err = restaurant_service::delete_restaurant(&state, &admin, restaurant_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // without menu items, orders or reservations the delete goes through,
    // taking staff and inventory records with it
    let doomed = restaurant_service::create_restaurant(
        &state,
        &admin,
        CreateRestaurantRequest {
            name: "Short Lived".into(),
            address: "1 Side Street".into(),
            phone: "555-0300".into(),
            email: "short@example.com".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let storekeeper = common::seed_staff(&state, doomed.id, &[RoleName::Manager]).await?;
    let crate_of_limes = inventory_service::create_inventory_item(
        &state,
        &storekeeper,
        CreateInventoryItemRequest {
            name: "Limes".into(),
            stock_level: 12,
            minimum_stock_level: 2,
            unit: 1,
            cost: Decimal::new(40, 2),
        },
    )
    .await?
    .data
    .unwrap();
    inventory_service::create_inventory_transaction(
        &state,
        &storekeeper,
        CreateInventoryTransactionRequest {
            inventory_item_id: crate_of_limes.id,
            quantity_changed: 12,
            reason: "initial delivery".into(),
        },
    )
    .await?;

    restaurant_service::delete_restaurant(&state, &admin, doomed.id).await?;
    let err = restaurant_service::get_restaurant(&state, &admin, doomed.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");

    Ok(())
}

#[tokio::test]
async fn only_admins_mint_admins() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Role Rules").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;
    let admin = common::seed_user(&state, &[RoleName::Admin]).await?;
    let target = common::seed_user(&state, &[RoleName::User]).await?;

    // manager grants an ordinary role
    let waiter_role = role_service::create_role(
        &state,
        &manager,
        CreateRoleRequest {
            user_id: target.user_id,
            name: RoleName::Waiter,
        },
    )
    .await?
    .data
    .unwrap();

    let fetched = role_service::get_role(&state, &manager, waiter_role.id)
        .await?
        .data
        .unwrap();
    assert_eq!(fetched.name, RoleName::Waiter);

    // but not Admin
    let err = role_service::create_role(
        &state,
        &manager,
        CreateRoleRequest {
            user_id: target.user_id,
            name: RoleName::Admin,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");

    // an admin can
    role_service::create_role(
        &state,
        &admin,
        CreateRoleRequest {
            user_id: target.user_id,
            name: RoleName::Admin,
        },
    )
    .await?;

    // duplicate grants collide
    let err = role_service::create_role(
        &state,
        &admin,
        CreateRoleRequest {
            user_id: target.user_id,
            name: RoleName::Waiter,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    let listed = role_service::list_roles_for_user(&state, &admin, target.user_id)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items.len(), 3);

    Ok(())
}
