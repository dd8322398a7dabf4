//! Observer fan-out for live prediction updates.
//!
//! Subscribers get one opaque signal per accepted manual report. Delivery is
//! lossy and best-effort: the channel is capacity-bounded, sends never block
//! the writer, and a lagged or disconnected subscriber is dropped silently.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Opaque "something changed" signal pushed to observers.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateEvent {
    /// Unique id so observers can de-duplicate re-deliveries.
    pub id: Uuid,
    /// When the triggering report was accepted.
    pub at: DateTime<FixedOffset>,
}

impl UpdateEvent {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self {
            id: Uuid::new_v4(),
            at,
        }
    }
}

/// Broadcast hub over a bounded lossy channel.
#[derive(Debug, Clone)]
pub struct ObserverHub {
    tx: broadcast::Sender<UpdateEvent>,
}

impl ObserverHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a new observer. Dropping the receiver unsubscribes it.
    pub fn subscribe(&self) -> broadcast::Receiver<UpdateEvent> {
        self.tx.subscribe()
    }

    /// Push an update to every current observer. Never blocks; a send with
    /// no listeners is not an error.
    pub fn notify(&self, event: UpdateEvent) {
        let _ = self.tx.send(event);
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ObserverHub {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn at() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 10, 7, 12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_subscribers_receive_updates() {
        let hub = ObserverHub::new(8);
        let mut rx = hub.subscribe();
        let event = UpdateEvent::new(at());
        hub.notify(event.clone());
        let got = rx.recv().await.unwrap();
        assert_eq!(got.id, event.id);
    }

    #[tokio::test]
    async fn test_notify_without_subscribers_is_fine() {
        let hub = ObserverHub::new(8);
        hub.notify(UpdateEvent::new(at()));
        assert_eq!(hub.observer_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_forgotten() {
        let hub = ObserverHub::new(8);
        let rx = hub.subscribe();
        assert_eq!(hub.observer_count(), 1);
        drop(rx);
        assert_eq!(hub.observer_count(), 0);
        hub.notify(UpdateEvent::new(at()));
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_instead_of_blocking() {
        let hub = ObserverHub::new(2);
        let mut rx = hub.subscribe();
        for _ in 0..5 {
            hub.notify(UpdateEvent::new(at()));
        }
        // The writer never blocked; the reader observes a lag error and is
        // expected to treat itself as disconnected.
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_)) | Ok(_)
        ));
    }
}
