use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Shop;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShopRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShopList {
    pub items: Vec<Shop>,
}

/// A freshly rendered QR code, for the printable-design flow.
#[derive(Debug, Serialize, ToSchema)]
pub struct QrImage {
    pub data_url: String,
}
