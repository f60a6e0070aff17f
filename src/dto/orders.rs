use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::lifecycle::OrderStatus;
use crate::models::Order;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// Kanban variant: four independent status buckets.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderBoard {
    pub pending: Vec<Order>,
    pub processing: Vec<Order>,
    pub completed: Vec<Order>,
    pub archived: Vec<Order>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClearArchivedRequest {
    /// Restrict the clear to one shop; `None` clears across all owned shops.
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearedArchived {
    pub cleared: u64,
}
