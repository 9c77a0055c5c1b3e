mod common;

use chrono::{Duration, Utc};
use restaurant_management_api::{
    domain::{RoleName, TableStatus},
    dto::{
        reservations::CreateReservationRequest,
        tables::CreateTableRequest,
    },
    error::AppError,
    services::{reservation_service, table_service},
};

// Two live reservations on the same table at the same instant collide;
// a different time on the same table is fine.
#[tokio::test]
async fn same_slot_reservations_collide() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Booked Brasserie").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 4,
            capacity: 4,
        },
    )
    .await?
    .data
    .unwrap();

    let tonight = Utc::now() + Duration::hours(6);

    reservation_service::create_reservation(
        &state,
        &manager,
        CreateReservationRequest {
            table_id: table.id,
            customer_name: "Ada".into(),
            customer_contact: "555-0101".into(),
            reservation_time: tonight,
            number_of_guests: 2,
            special_requests: None,
        },
    )
    .await?;

    let reserved = table_service::get_table(&state, &manager, table.id)
        .await?
        .data
        .unwrap();
    assert_eq!(reserved.status, TableStatus::Reserved);

    let err = reservation_service::create_reservation(
        &state,
        &manager,
        CreateReservationRequest {
            table_id: table.id,
            customer_name: "Grace".into(),
            customer_contact: "555-0102".into(),
            reservation_time: tonight,
            number_of_guests: 4,
            special_requests: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    // a later slot on the same table books fine
    reservation_service::create_reservation(
        &state,
        &manager,
        CreateReservationRequest {
            table_id: table.id,
            customer_name: "Grace".into(),
            customer_contact: "555-0102".into(),
            reservation_time: tonight + Duration::hours(2),
            number_of_guests: 4,
            special_requests: None,
        },
    )
    .await?;

    Ok(())
}

#[tokio::test]
async fn customer_search_matches_case_insensitively() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Lookup Lounge").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 7,
            capacity: 2,
        },
    )
    .await?
    .data
    .unwrap();

    let slot = Utc::now() + Duration::hours(4);
    for (name, offset) in [("Ada Lovelace", 0), ("Grace Hopper", 2)] {
        reservation_service::create_reservation(
            &state,
            &manager,
            CreateReservationRequest {
                table_id: table.id,
                customer_name: name.into(),
                customer_contact: "555-0100".into(),
                reservation_time: slot + Duration::hours(offset),
                number_of_guests: 2,
                special_requests: None,
            },
        )
        .await?;
    }

    let hits = reservation_service::search_reservations(&state, &manager, "lovelace")
        .await?
        .data
        .unwrap();
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].customer_name, "Ada Lovelace");

    // substring in the middle of the name still matches
    let hits = reservation_service::search_reservations(&state, &manager, "RACE")
        .await?
        .data
        .unwrap();
    assert_eq!(hits.items.len(), 1);

    let hits = reservation_service::search_reservations(&state, &manager, "nobody")
        .await?
        .data
        .unwrap();
    assert!(hits.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn cancelling_last_reservation_frees_the_table() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let restaurant_id = common::seed_restaurant(&state, "Release Restaurant").await?;
    let manager = common::seed_staff(&state, restaurant_id, &[RoleName::Manager]).await?;

    let table = table_service::create_table(
        &state,
        &manager,
        CreateTableRequest {
            number: 9,
            capacity: 6,
        },
    )
    .await?
    .data
    .unwrap();

    let slot_a = Utc::now() + Duration::hours(3);
    let slot_b = slot_a + Duration::hours(2);

    let first = reservation_service::create_reservation(
        &state,
        &manager,
        CreateReservationRequest {
            table_id: table.id,
            customer_name: "Ada".into(),
            customer_contact: "555-0101".into(),
            reservation_time: slot_a,
            number_of_guests: 2,
            special_requests: None,
        },
    )
    .await?
    .data
    .unwrap();

    let second = reservation_service::create_reservation(
        &state,
        &manager,
        CreateReservationRequest {
            table_id: table.id,
            customer_name: "Grace".into(),
            customer_contact: "555-0102".into(),
            reservation_time: slot_b,
            number_of_guests: 4,
            special_requests: Some("window seat".into()),
        },
    )
    .await?
    .data
    .unwrap();

    // another live reservation still holds the table
    reservation_service::cancel_reservation(&state, &manager, first.id).await?;
    let held = table_service::get_table(&state, &manager, table.id)
        .await?
        .data
        .unwrap();
    assert_eq!(held.status, TableStatus::Reserved);

    // the last one releases it
    reservation_service::cancel_reservation(&state, &manager, second.id).await?;
    let freed = table_service::get_table(&state, &manager, table.id)
        .await?
        .data
        .unwrap();
    assert_eq!(freed.status, TableStatus::Available);

    // cancelling twice is a conflict
    let err = reservation_service::cancel_reservation(&state, &manager, second.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    Ok(())
}
