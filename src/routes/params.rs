use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::lifecycle::OrderView;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub shop_id: Option<Uuid>,
    pub view: Option<OrderView>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BoardQuery {
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QrQuery {
    pub width: Option<u32>,
    pub margin: Option<u32>,
    /// Foreground hex color, e.g. `#000000`.
    pub dark: Option<String>,
    /// Background hex color, e.g. `#ffffff`.
    pub light: Option<String>,
}
