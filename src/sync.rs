//! Change notification hub backing the live dashboard.
//!
//! Every write to shops or orders notifies the hub; each subscriber reacts
//! by re-querying a full [`DashboardSnapshot`] and replacing its previous
//! state wholesale, snapshots rather than diffs. Because the snapshot query
//! re-derives the owned-shop set each time, a change to the shop list
//! automatically widens or narrows the order query on the next event.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, Shop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Shops,
    Orders,
}

#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    /// Owner whose dashboard is affected. `None` means the writer could not
    /// attribute the change, so every subscriber re-queries.
    pub owner_id: Option<Uuid>,
}

impl ChangeEvent {
    pub fn concerns(&self, owner_id: Uuid) -> bool {
        self.owner_id.is_none_or(|id| id == owner_id)
    }
}

#[derive(Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn notify(&self, event: ChangeEvent) {
        // Send only fails when nobody is listening, which is fine.
        let _ = self.tx.send(event);
    }

    pub fn shops_changed(&self, owner_id: Uuid) {
        self.notify(ChangeEvent {
            kind: ChangeKind::Shops,
            owner_id: Some(owner_id),
        });
    }

    pub fn orders_changed(&self, owner_id: Option<Uuid>) {
        self.notify(ChangeEvent {
            kind: ChangeKind::Orders,
            owner_id,
        });
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Full dashboard state delivered on every change: the caller's shops and
/// every non-deleted order of those shops, newest first, plus the badge
/// count for each shop's filter button.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSnapshot {
    pub shops: Vec<Shop>,
    pub orders: Vec<Order>,
    pub counts: Vec<ShopOrderCount>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShopOrderCount {
    pub shop_id: Uuid,
    pub orders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notifications() {
        let hub = ChangeHub::default();
        let mut rx = hub.subscribe();
        let owner = Uuid::new_v4();

        hub.shops_changed(owner);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Shops);
        assert_eq!(event.owner_id, Some(owner));
    }

    #[test]
    fn scoped_events_only_concern_their_owner() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let scoped = ChangeEvent {
            kind: ChangeKind::Orders,
            owner_id: Some(owner),
        };
        assert!(scoped.concerns(owner));
        assert!(!scoped.concerns(other));

        let unscoped = ChangeEvent {
            kind: ChangeKind::Orders,
            owner_id: None,
        };
        assert!(unscoped.concerns(owner));
        assert!(unscoped.concerns(other));
    }

    #[tokio::test]
    async fn late_subscribers_miss_earlier_events() {
        let hub = ChangeHub::default();
        hub.orders_changed(None);

        let mut rx = hub.subscribe();
        hub.orders_changed(None);
        assert!(rx.recv().await.is_ok());
        assert!(rx.try_recv().is_err());
    }
}
