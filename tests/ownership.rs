use std::sync::Arc;

use axum_printshop_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{orders::UpdateOrderStatusRequest, shops::CreateShopRequest},
    entity::users::ActiveModel as UserActive,
    lifecycle::OrderStatus,
    middleware::auth::AuthUser,
    routes::params::OrderListQuery,
    services::{order_service, shop_service, upload_service},
    state::AppState,
    storage::LocalBlobStore,
    sync::ChangeHub,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// A shop and its orders are visible to exactly one identity: the owner.
#[tokio::test]
async fn foreign_shops_and_orders_stay_invisible() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let owner = AuthUser {
        user_id: create_user(&state).await?,
    };
    let stranger = AuthUser {
        user_id: create_user(&state).await?,
    };

    let shop = shop_service::create_shop(
        &state,
        &owner,
        CreateShopRequest {
            name: "Harbor Copy".into(),
        },
    )
    .await?
    .data
    .unwrap();

    let receipt = upload_service::create_order(
        &state,
        shop.id,
        vec![upload_service::UploadFile {
            name: "doc.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: vec![0u8; 16],
        }],
    )
    .await?
    .data
    .unwrap();

    // The stranger sees no shops, cannot filter by the foreign shop and
    // cannot touch the order.
    let shops = shop_service::list_shops(&state, &stranger)
        .await?
        .data
        .unwrap();
    assert!(shops.items.is_empty());

    assert!(
        order_service::list_orders(
            &state,
            &stranger,
            OrderListQuery {
                shop_id: Some(shop.id),
                view: None,
            },
        )
        .await
        .is_err()
    );
    assert!(
        order_service::update_status(
            &state,
            &stranger,
            receipt.order_id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Processing,
            },
        )
        .await
        .is_err()
    );

    // The owner still sees everything.
    let orders = order_service::list_orders(
        &state,
        &owner,
        OrderListQuery {
            shop_id: Some(shop.id),
            view: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(orders.items.len(), 1);

    Ok(())
}

// No truncation here; rows are keyed by fresh UUIDs so reruns coexist with
// whatever earlier suites left behind.
async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 3000,
        base_url: Some("http://localhost:3000".to_string()),
        storage_root: std::env::temp_dir()
            .join(format!("printshop-it-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
    };
    let store = Arc::new(LocalBlobStore::new(
        config.storage_root.clone(),
        config.public_base_url(),
    ));

    Ok(AppState {
        pool,
        orm,
        config,
        store,
        changes: ChangeHub::default(),
    })
}

async fn create_user(state: &AppState) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("user-{}@example.com", Uuid::new_v4())),
        password_hash: Set("dummy".into()),
        display_name: Set(Some("Test Owner".into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
