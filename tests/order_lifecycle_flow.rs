use std::sync::Arc;

use axum_printshop_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        orders::{ClearArchivedRequest, UpdateOrderStatusRequest},
        shops::CreateShopRequest,
    },
    entity::users::ActiveModel as UserActive,
    lifecycle::OrderStatus,
    middleware::auth::AuthUser,
    routes::params::{BoardQuery, OrderListQuery},
    services::{order_service, shop_service, upload_service},
    state::AppState,
    storage::LocalBlobStore,
    sync::ChangeHub,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: owner creates a shop, a customer uploads two files,
// the owner walks the order through the whole workflow and finally clears
// the archive.
#[tokio::test]
async fn upload_process_archive_and_clear_flow() -> anyhow::Result<()> {
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
    let mut changes = state.changes.subscribe();

    let owner_id = create_user(&state, "owner@example.com").await?;
    let owner = AuthUser { user_id: owner_id };

    // Shop creation renders the default QR code.
    let shop_resp = shop_service::create_shop(
        &state,
        &owner,
        CreateShopRequest {
            name: "Downtown Print".into(),
        },
    )
    .await?;
    let shop = shop_resp.data.unwrap();
    let qr = shop.qr_code_url.expect("qr code generated at creation");
    assert!(qr.starts_with("data:image/png;base64,"));
    assert!(changes.recv().await.is_ok(), "shop creation notifies the hub");

    // Anonymous customer uploads two files.
    let receipt = upload_service::create_order(
        &state,
        shop.id,
        vec![
            upload_file("doc.pdf", vec![0u8; 1024]),
            upload_file("image.png", vec![1u8; 2048]),
        ],
    )
    .await?
    .data
    .unwrap();
    assert_eq!(receipt.files, 2);
    assert_eq!(receipt.order_number.len(), 7);

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
    .unwrap()
    .items;
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.files.len(), 2);
    assert_eq!(order.files[0].name, "doc.pdf");
    assert!(order.completed_at.is_none());

    // The uploaded blobs are retrievable through the store.
    let blob = state.store.get(&order.files[1].path).await?;
    assert_eq!(blob.len(), 2048);

    // The live snapshot already carries the order and the badge count.
    let snapshot = order_service::snapshot(&state, &owner).await?;
    assert_eq!(snapshot.orders.len(), 1);
    assert_eq!(snapshot.counts.len(), 1);
    assert_eq!(snapshot.counts[0].shop_id, shop.id);
    assert_eq!(snapshot.counts[0].orders, 1);

    // pending -> processing -> completed -> archived.
    let order_id = order.id;
    let processing = order_service::update_status(
        &state,
        &owner,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Processing,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(processing.status, OrderStatus::Processing);
    assert!(processing.completed_at.is_none());

    // Skipping ahead is rejected.
    assert!(
        order_service::update_status(
            &state,
            &owner,
            order_id,
            UpdateOrderStatusRequest {
                status: OrderStatus::Archived,
            },
        )
        .await
        .is_err()
    );

    let completed = order_service::update_status(
        &state,
        &owner,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Completed,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    let completed_at = completed.completed_at.expect("completion is stamped");

    let archived = order_service::update_status(
        &state,
        &owner,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Archived,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(archived.status, OrderStatus::Archived);
    assert_eq!(archived.completed_at, Some(completed_at));

    // A second order goes straight to archived via the delete shortcut.
    let second = upload_service::create_order(
        &state,
        shop.id,
        vec![upload_file("flyer.pdf", vec![2u8; 64])],
    )
    .await?
    .data
    .unwrap();
    let deleted = order_service::delete_order(&state, &owner, second.order_id)
        .await?
        .data
        .unwrap();
    assert_eq!(deleted.status, OrderStatus::Archived);
    assert!(deleted.completed_at.is_none(), "delete skips completion");

    // Both orders sit in the archived column of the board.
    let board = order_service::board(
        &state,
        &owner,
        BoardQuery {
            shop_id: Some(shop.id),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(board.archived.len(), 2);
    assert!(board.pending.is_empty());

    // Clearing hides them everywhere but keeps the rows.
    let cleared = order_service::clear_archived(
        &state,
        &owner,
        ClearArchivedRequest {
            shop_id: Some(shop.id),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cleared.cleared, 2);

    let snapshot = order_service::snapshot(&state, &owner).await?;
    assert_eq!(snapshot.shops.len(), 1);
    assert!(snapshot.orders.is_empty());
    assert_eq!(snapshot.counts[0].orders, 0);

    // A second clear has nothing left to touch.
    assert!(
        order_service::clear_archived(&state, &owner, ClearArchivedRequest { shop_id: None })
            .await
            .is_err()
    );

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE orders, shops, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

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

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        display_name: Set(Some("Test Owner".into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

fn upload_file(name: &str, bytes: Vec<u8>) -> upload_service::UploadFile {
    upload_service::UploadFile {
        name: name.to_string(),
        content_type: "application/octet-stream".to_string(),
        bytes,
    }
}
