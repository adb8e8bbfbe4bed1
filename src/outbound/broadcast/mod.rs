//! In-process change notification bus.
//!
//! A single [`tokio::sync::broadcast`] channel fans committed transitions
//! out to every subscribed WebSocket session. The bus holds no durable
//! state: events published while a session is not subscribed are gone, and
//! a subscriber that falls behind the channel capacity observes a lag and
//! must re-read the store.

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ChangeEvent;
use crate::domain::ports::ChangePublisher;

/// Name of the broadcast group sessions must explicitly join.
pub const EQUIPMENT_UPDATES_ROOM: &str = "equipment-updates";

/// Events buffered per subscriber before older ones are dropped as lag.
const CHANNEL_CAPACITY: usize = 256;

/// Fan-out bus for committed equipment transitions.
#[derive(Debug, Clone)]
pub struct EquipmentBroadcast {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EquipmentBroadcast {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Open a new subscription. The receiver only observes events published
    /// after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Number of currently open subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EquipmentBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangePublisher for EquipmentBroadcast {
    fn publish(&self, event: ChangeEvent) {
        // send only fails with zero subscribers, which is a valid state.
        if self.sender.send(event).is_err() {
            debug!("transition broadcast with no subscribers");
        }
    }
}
