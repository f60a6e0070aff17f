use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::lifecycle::OrderStatus;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One print shop. Visible only to its owner; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    /// PNG data URL for the shop's upload QR code. Absent for the short
    /// window between shop creation and QR generation.
    pub qr_code_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Metadata plus retrieval pointer for one uploaded blob, embedded in the
/// order document rather than stored as its own row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
    pub path: String,
}

/// One customer upload batch. `deleted` hides the order from every view
/// without removing the row, independent of `status`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub order_number: String,
    pub files: Vec<FileRecord>,
    pub status: OrderStatus,
    pub deleted: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
