//! Order lifecycle: the status state machine and the derived views the
//! dashboard renders from each snapshot.
//!
//! Status moves forward only (`pending` → `processing` → `completed` →
//! `archived`). Two separate escape hatches exist outside [`advance`]: the
//! owner's Delete action collapses any status straight to `archived`, and
//! Clear-Archived flips the `deleted` flag without touching `status`. The
//! two flags are kept independent.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Archived,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Archived => "archived",
        }
    }

    /// Parse the database encoding. The column has a CHECK constraint, so a
    /// mismatch means a broken row and is reported as an internal error.
    pub fn from_db(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "archived" => Ok(OrderStatus::Archived),
            other => Err(AppError::Internal(anyhow::anyhow!(
                "unknown order status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a valid transition does besides changing `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEffect {
    /// `completed_at` is stamped exactly when an order enters `completed`.
    pub sets_completed_at: bool,
}

/// Validate an owner-triggered workflow move. Only the three forward steps
/// are accepted; everything else (backward moves, skips, self-transitions)
/// is rejected.
pub fn advance(from: OrderStatus, to: OrderStatus) -> AppResult<TransitionEffect> {
    use OrderStatus::*;
    match (from, to) {
        (Pending, Processing) => Ok(TransitionEffect {
            sets_completed_at: false,
        }),
        (Processing, Completed) => Ok(TransitionEffect {
            sets_completed_at: true,
        }),
        (Completed, Archived) => Ok(TransitionEffect {
            sets_completed_at: false,
        }),
        _ => Err(AppError::BadRequest(format!(
            "Cannot move order from {from} to {to}"
        ))),
    }
}

/// The legacy two-tab dashboard split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderView {
    /// `pending` and `processing`.
    Active,
    /// `completed` and `archived`.
    Archived,
}

pub fn in_view(status: OrderStatus, view: OrderView) -> bool {
    match view {
        OrderView::Active => matches!(status, OrderStatus::Pending | OrderStatus::Processing),
        OrderView::Archived => matches!(status, OrderStatus::Completed | OrderStatus::Archived),
    }
}

/// Drop orders the owner has cleared. Applied before any view is derived,
/// so a deleted order never surfaces anywhere regardless of its status.
pub fn visible(orders: Vec<Order>) -> Vec<Order> {
    orders.into_iter().filter(|o| !o.deleted).collect()
}

pub fn filter_view(orders: Vec<Order>, view: OrderView) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|o| in_view(o.status, view))
        .collect()
}

pub fn filter_shop(orders: Vec<Order>, shop_id: Option<Uuid>) -> Vec<Order> {
    match shop_id {
        Some(id) => orders.into_iter().filter(|o| o.shop_id == id).collect(),
        None => orders,
    }
}

/// One kanban column: a single status, optionally narrowed to one shop.
pub fn bucket(orders: &[Order], status: OrderStatus, shop_id: Option<Uuid>) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| !o.deleted && o.status == status)
        .filter(|o| shop_id.is_none_or(|id| o.shop_id == id))
        .cloned()
        .collect()
}

/// Badge count for one shop's filter button.
pub fn shop_count(orders: &[Order], shop_id: Uuid) -> usize {
    orders
        .iter()
        .filter(|o| !o.deleted && o.shop_id == shop_id)
        .count()
}
