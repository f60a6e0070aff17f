use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        ClearArchivedRequest, ClearedArchived, OrderBoard, OrderList, UpdateOrderStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::{BoardQuery, OrderListQuery},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/board", get(board))
        .route("/{id}/status", patch(update_status))
        .route("/{id}", delete(delete_order))
        .route("/clear-archived", post(clear_archived))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("shop_id" = Option<Uuid>, Query, description = "Restrict to one owned shop"),
        ("view" = Option<String>, Query, description = "Two-tab filter: active, archived"),
    ),
    responses(
        (status = 200, description = "Orders across owned shops, newest first", body = ApiResponse<OrderList>),
        (status = 404, description = "Unknown or foreign shop id"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/board",
    params(
        ("shop_id" = Option<Uuid>, Query, description = "Restrict to one owned shop"),
    ),
    responses(
        (status = 200, description = "Orders grouped into the four status columns", body = ApiResponse<OrderBoard>),
        (status = 404, description = "Unknown or foreign shop id"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn board(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BoardQuery>,
) -> AppResult<Json<ApiResponse<OrderBoard>>> {
    let resp = order_service::board(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = ApiResponse<Order>),
        (status = 400, description = "Invalid transition"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
    ),
    responses(
        (status = 200, description = "Order archived (soft delete)", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::delete_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/clear-archived",
    request_body = ClearArchivedRequest,
    responses(
        (status = 200, description = "Archived orders hidden for good", body = ApiResponse<ClearedArchived>),
        (status = 400, description = "Nothing to clear"),
        (status = 404, description = "Unknown or foreign shop id"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn clear_archived(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ClearArchivedRequest>,
) -> AppResult<Json<ApiResponse<ClearedArchived>>> {
    let resp = order_service::clear_archived(&state, &user, payload).await?;
    Ok(Json(resp))
}
