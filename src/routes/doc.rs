use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        orders::{ClearArchivedRequest, ClearedArchived, OrderBoard, OrderList, UpdateOrderStatusRequest},
        shops::{CreateShopRequest, QrImage, ShopList},
        uploads::{PublicShop, UploadReceipt},
    },
    lifecycle::OrderStatus,
    models::{FileRecord, Order, Shop, User},
    response::{ApiResponse, Meta},
    routes::{auth, events, health, orders, params, shops, uploads},
    sync::{DashboardSnapshot, ShopOrderCount},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        shops::list_shops,
        shops::create_shop,
        shops::design_qr,
        orders::list_orders,
        orders::board,
        orders::update_status,
        orders::delete_order,
        orders::clear_archived,
        uploads::shop_info,
        uploads::upload_files,
        events::dashboard_events,
    ),
    components(
        schemas(
            User,
            Shop,
            Order,
            FileRecord,
            OrderStatus,
            ShopList,
            CreateShopRequest,
            QrImage,
            OrderList,
            OrderBoard,
            UpdateOrderStatusRequest,
            ClearArchivedRequest,
            ClearedArchived,
            PublicShop,
            UploadReceipt,
            DashboardSnapshot,
            ShopOrderCount,
            params::OrderListQuery,
            params::BoardQuery,
            params::QrQuery,
            Meta,
            ApiResponse<Shop>,
            ApiResponse<ShopList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderBoard>,
            ApiResponse<UploadReceipt>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Shops", description = "Shop and QR code endpoints"),
        (name = "Orders", description = "Order workflow endpoints"),
        (name = "Upload", description = "Anonymous customer upload endpoints"),
        (name = "Events", description = "Live dashboard feed"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
