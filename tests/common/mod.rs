use chrono::Utc;
use restaurant_management_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    domain::RoleName,
    entity::{
        employees::ActiveModel as EmployeeActive, restaurants::ActiveModel as RestaurantActive,
        roles::ActiveModel as RoleActive, users::ActiveModel as UserActive,
    },
    events::Hub,
    middleware::auth::AuthUser,
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

/// Connects to the configured test database, or `None` to skip when no
/// database is available. Tests isolate through fresh UUIDs per run, so
/// no table is ever truncated here.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&pool).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
    };

    Ok(Some(AppState {
        config,
        pool,
        orm,
        hub: Hub::new(),
    }))
}

pub async fn seed_restaurant(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        address: Set("1 Test Street".into()),
        phone: Set("555-0100".into()),
        email: Set(format!("contact-{}@example.com", Uuid::new_v4())),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(restaurant.id)
}

/// Seeds a user with the given roles and an active employee record at the
/// restaurant, returning the session the services expect.
pub async fn seed_staff(
    state: &AppState,
    restaurant_id: Uuid,
    roles: &[RoleName],
) -> anyhow::Result<AuthUser> {
    let user = seed_user(state, roles).await?;

    EmployeeActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        restaurant_id: Set(restaurant_id),
        salary: Set(Decimal::new(2_500_00, 2)),
        hire_date: Set(Utc::now().into()),
        is_active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    Ok(user)
}

/// Seeds a user with roles but no employee record (admins live outside
/// any single restaurant).
pub async fn seed_user(state: &AppState, roles: &[RoleName]) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        first_name: Set("Test".into()),
        last_name: Set("User".into()),
        email: Set(format!("user-{}@example.com", Uuid::new_v4())),
        password_hash: Set("irrelevant".into()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    for role in roles {
        RoleActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            name: Set(*role),
        }
        .insert(&state.orm)
        .await?;
    }

    Ok(AuthUser {
        user_id: user.id,
        roles: roles.to_vec(),
    })
}
