use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// What an anonymous customer may see about a shop.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicShop {
    pub id: Uuid,
    pub name: String,
}

/// Confirmation handed back after a successful upload session. The order
/// number is the customer's only handle on the order.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadReceipt {
    pub order_id: Uuid,
    pub order_number: String,
    pub files: usize,
}
