use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::shops::{CreateShopRequest, QrImage, ShopList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Shop,
    response::ApiResponse,
    routes::params::QrQuery,
    services::shop_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shops).post(create_shop))
        .route("/{id}/qr", get(design_qr))
}

#[utoipa::path(
    get,
    path = "/api/shops",
    responses(
        (status = 200, description = "Shops owned by the caller", body = ApiResponse<ShopList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn list_shops(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ShopList>>> {
    let resp = shop_service::list_shops(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shops",
    request_body = CreateShopRequest,
    responses(
        (status = 200, description = "Create a shop and its upload QR code", body = ApiResponse<Shop>),
        (status = 400, description = "Empty shop name"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn create_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateShopRequest>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = shop_service::create_shop(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shops/{id}/qr",
    params(
        ("id" = Uuid, Path, description = "Shop ID"),
        ("width" = Option<u32>, Query, description = "Image width in pixels, default 512"),
        ("margin" = Option<u32>, Query, description = "Quiet zone in modules, default 2"),
        ("dark" = Option<String>, Query, description = "Foreground hex color, default #000000"),
        ("light" = Option<String>, Query, description = "Background hex color, default #ffffff"),
    ),
    responses(
        (status = 200, description = "Custom-colored QR code", body = ApiResponse<QrImage>),
        (status = 400, description = "Invalid color"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn design_qr(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<QrQuery>,
) -> AppResult<Json<ApiResponse<QrImage>>> {
    let resp = shop_service::design_qr(&state, &user, id, query).await?;
    Ok(Json(resp))
}
