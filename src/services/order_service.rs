use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        ClearArchivedRequest, ClearedArchived, OrderBoard, OrderList, UpdateOrderStatusRequest,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        shops::{Column as ShopCol, Entity as Shops},
    },
    error::{AppError, AppResult},
    lifecycle::{self, OrderStatus},
    middleware::auth::AuthUser,
    models::{FileRecord, Order},
    response::{ApiResponse, Meta},
    routes::params::{BoardQuery, OrderListQuery},
    services::shop_service,
    state::AppState,
    sync::{DashboardSnapshot, ShopOrderCount},
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let shop_ids = owned_shop_ids(state, user).await?;
    if let Some(shop_id) = query.shop_id {
        if !shop_ids.contains(&shop_id) {
            return Err(AppError::NotFound);
        }
    }

    let mut orders = fetch_orders(state, &shop_ids).await?;
    if let Some(view) = query.view {
        orders = lifecycle::filter_view(orders, view);
    }
    let orders = lifecycle::filter_shop(orders, query.shop_id);

    let total = orders.len() as i64;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn board(
    state: &AppState,
    user: &AuthUser,
    query: BoardQuery,
) -> AppResult<ApiResponse<OrderBoard>> {
    let shop_ids = owned_shop_ids(state, user).await?;
    if let Some(shop_id) = query.shop_id {
        if !shop_ids.contains(&shop_id) {
            return Err(AppError::NotFound);
        }
    }

    let orders = fetch_orders(state, &shop_ids).await?;
    let board = OrderBoard {
        pending: lifecycle::bucket(&orders, OrderStatus::Pending, query.shop_id),
        processing: lifecycle::bucket(&orders, OrderStatus::Processing, query.shop_id),
        completed: lifecycle::bucket(&orders, OrderStatus::Completed, query.shop_id),
        archived: lifecycle::bucket(&orders, OrderStatus::Archived, query.shop_id),
    };

    Ok(ApiResponse::success("Ok", board, Some(Meta::empty())))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let order = find_owned_order(state, user, id).await?;

    let from = OrderStatus::from_db(&order.status)?;
    let effect = lifecycle::advance(from, payload.status)?;

    // One atomic row update; concurrent owner sessions race and the last
    // write wins. No version check.
    let mut active: OrderActive = order.into();
    active.status = Set(payload.status.as_str().to_string());
    if effect.sets_completed_at {
        active.completed_at = Set(Some(Utc::now().into()));
    }
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_changed",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state.changes.orders_changed(Some(user.user_id));

    let message = if payload.status == OrderStatus::Completed {
        "Order completed"
    } else {
        "Status updated"
    };
    Ok(ApiResponse::success(
        message,
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

/// Soft-delete shortcut: collapse the order straight to `archived`, from
/// any status. Afterwards it is indistinguishable from one that was
/// archived normally.
pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = find_owned_order(state, user, id).await?;

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Archived.as_str().to_string());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_deleted",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state.changes.orders_changed(Some(user.user_id));

    Ok(ApiResponse::success(
        "Order deleted",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

/// Flag every archived order as deleted, leaving `status` untouched. The
/// rows stay behind as an audit trail but disappear from every view.
pub async fn clear_archived(
    state: &AppState,
    user: &AuthUser,
    payload: ClearArchivedRequest,
) -> AppResult<ApiResponse<ClearedArchived>> {
    let shop_ids = owned_shop_ids(state, user).await?;
    let scope = match payload.shop_id {
        Some(shop_id) => {
            if !shop_ids.contains(&shop_id) {
                return Err(AppError::NotFound);
            }
            vec![shop_id]
        }
        None => shop_ids,
    };

    if scope.is_empty() {
        return Err(AppError::BadRequest(
            "No archived orders to clear".to_string(),
        ));
    }

    let result = Orders::update_many()
        .col_expr(OrderCol::Deleted, Expr::value(true))
        .filter(OrderCol::ShopId.is_in(scope))
        .filter(OrderCol::Status.eq(OrderStatus::Archived.as_str()))
        .filter(OrderCol::Deleted.eq(false))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::BadRequest(
            "No archived orders to clear".to_string(),
        ));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "archived_cleared",
        Some("orders"),
        Some(serde_json::json!({ "cleared": result.rows_affected })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    state.changes.orders_changed(Some(user.user_id));

    Ok(ApiResponse::success(
        format!("Cleared {} archived order(s)", result.rows_affected),
        ClearedArchived {
            cleared: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}

/// Everything one dashboard needs, rebuilt from scratch. The owned-shop
/// set is re-read every time, so the order query follows shop changes.
pub async fn snapshot(state: &AppState, user: &AuthUser) -> AppResult<DashboardSnapshot> {
    let shops: Vec<_> = Shops::find()
        .filter(ShopCol::OwnerId.eq(user.user_id))
        .order_by_asc(ShopCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let shop_ids: Vec<Uuid> = shops.iter().map(|s| s.id).collect();
    let orders = fetch_orders(state, &shop_ids).await?;
    let counts = shop_ids
        .iter()
        .map(|&shop_id| ShopOrderCount {
            shop_id,
            orders: lifecycle::shop_count(&orders, shop_id),
        })
        .collect();

    Ok(DashboardSnapshot {
        shops: shops
            .into_iter()
            .map(shop_service::shop_from_entity)
            .collect(),
        orders,
        counts,
    })
}

async fn owned_shop_ids(state: &AppState, user: &AuthUser) -> AppResult<Vec<Uuid>> {
    let shops = Shops::find()
        .filter(ShopCol::OwnerId.eq(user.user_id))
        .all(&state.orm)
        .await?;
    Ok(shops.into_iter().map(|s| s.id).collect())
}

/// Orders of the given shops, newest first. Cleared orders are dropped
/// after the fetch, the same place the dashboard would drop them.
async fn fetch_orders(state: &AppState, shop_ids: &[Uuid]) -> AppResult<Vec<Order>> {
    if shop_ids.is_empty() {
        return Ok(Vec::new());
    }

    let orders = Orders::find()
        .filter(OrderCol::ShopId.is_in(shop_ids.to_vec()))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<Order>>>()?;

    Ok(lifecycle::visible(orders))
}

async fn find_owned_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<OrderModel> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    // Ownership runs through the shop.
    shop_service::find_owned_shop(state, user, order.shop_id).await?;
    Ok(order)
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let files: Vec<FileRecord> = serde_json::from_value(model.files)?;
    Ok(Order {
        id: model.id,
        shop_id: model.shop_id,
        order_number: model.order_number,
        files,
        status: OrderStatus::from_db(&model.status)?,
        deleted: model.deleted,
        completed_at: model.completed_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    })
}
