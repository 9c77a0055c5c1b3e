//! Per-restaurant change-notification fan-out.
//!
//! Signals carry a name and nothing else; subscribers re-fetch whatever
//! list the signal concerns. Delivery is best-effort, at-most-once per
//! connected client, unordered, no replay. The policy on publish failure
//! is drop-and-log; the database write a signal follows is never rolled
//! back because a subscriber was missing or lagging. Every publish also
//! appends to the `events` outbox table so dropped signals stay auditable.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DomainEvent {
    CategoryChanged,
    MenuItemChanged,
    TableChanged,
    OrderChanged,
    PaymentRecorded,
    InvoiceIssued,
    ReservationChanged,
    EmployeeChanged,
}

impl DomainEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainEvent::CategoryChanged => "CategoryChanged",
            DomainEvent::MenuItemChanged => "MenuItemChanged",
            DomainEvent::TableChanged => "TableChanged",
            DomainEvent::OrderChanged => "OrderChanged",
            DomainEvent::PaymentRecorded => "PaymentRecorded",
            DomainEvent::InvoiceIssued => "InvoiceIssued",
            DomainEvent::ReservationChanged => "ReservationChanged",
            DomainEvent::EmployeeChanged => "EmployeeChanged",
        }
    }
}

/// One broadcast channel per restaurant, created lazily on first use.
#[derive(Clone, Default)]
pub struct Hub {
    channels: Arc<DashMap<Uuid, broadcast::Sender<DomainEvent>>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, restaurant_id: Uuid) -> broadcast::Receiver<DomainEvent> {
        self.sender(restaurant_id).subscribe()
    }

    pub fn broadcast(&self, restaurant_id: Uuid, event: DomainEvent) {
        // send only fails when nobody is subscribed, which is fine.
        let _ = self.sender(restaurant_id).send(event);
    }

    fn sender(&self, restaurant_id: Uuid) -> broadcast::Sender<DomainEvent> {
        self.channels
            .entry(restaurant_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

/// Fire-and-forget from the caller's perspective: errors are logged, never
/// propagated, so a failed notification cannot fail the committed write.
pub async fn publish(state: &AppState, restaurant_id: Uuid, event: DomainEvent) {
    if let Err(err) = append_outbox(state, restaurant_id, event).await {
        tracing::warn!(error = %err, event = event.as_str(), "event outbox insert failed");
    }
    state.hub.broadcast(restaurant_id, event);
    tracing::debug!(event = event.as_str(), %restaurant_id, "event published");
}

async fn append_outbox(
    state: &AppState,
    restaurant_id: Uuid,
    event: DomainEvent,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO events (id, restaurant_id, name)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(restaurant_id)
    .bind(event.as_str())
    .execute(&state.pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_restaurant() {
        let hub = Hub::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut rx_a = hub.subscribe(a);
        let mut rx_b = hub.subscribe(b);

        hub.broadcast(a, DomainEvent::OrderChanged);

        assert_eq!(rx_a.recv().await.unwrap(), DomainEvent::OrderChanged);
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_is_a_noop() {
        let hub = Hub::new();
        hub.broadcast(Uuid::new_v4(), DomainEvent::TableChanged);
    }
}
