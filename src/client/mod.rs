//! Connection-side view of the catalog.
//!
//! A connected viewer keeps a local mirror of the equipment list and patches
//! it from broadcast events instead of polling. The cache never invents
//! records: events for ids it does not hold are dropped, and any gap
//! (reconnect, missed event) is healed by a full [`EquipmentViewCache::replace_all`]
//! from the store.

use tracing::debug;

use crate::domain::{ChangeEvent, Equipment};

/// Lifecycle of the realtime link backing a view.
///
/// `Subscribed` is reachable only from `Connected`: joining the broadcast
/// group is an explicit step that must be repeated after every reconnect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Subscribed,
}

/// Local mirror of the equipment list for one viewer.
#[derive(Debug, Default)]
pub struct EquipmentViewCache {
    items: Vec<Equipment>,
    connection: ConnectionState,
}

impl EquipmentViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Equipment] {
        &self.items
    }

    /// Replace the whole mirror with a fresh read of the store. Used on
    /// initial load, after a self-originated mutation, and after any
    /// reconnect.
    pub fn replace_all(&mut self, items: Vec<Equipment>) {
        self.items = items;
    }

    /// Patch the matching record in place. Only `status` and `borrowed_by`
    /// change; an event for an unheld id is dropped.
    pub fn apply_event(&mut self, event: &ChangeEvent) {
        let Some(record) = self.items.iter_mut().find(|r| r.id == event.equipment_id) else {
            debug!(equipment_id = event.equipment_id, "event for unheld record dropped");
            return;
        };
        record.status = event.new_status;
        record.borrowed_by = event.borrowed_by.clone();
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Record a state change of the realtime link. Illegal moves (such as
    /// `Subscribed` from anywhere but `Connected`) are ignored so a racing
    /// close cannot corrupt the machine.
    pub fn set_connection(&mut self, next: ConnectionState) {
        if next == ConnectionState::Subscribed && self.connection != ConnectionState::Connected {
            debug!("subscription recorded without an open connection; ignored");
            return;
        }
        self.connection = next;
    }

    /// Display-only indicator for the viewer.
    pub fn is_connected(&self) -> bool {
        matches!(
            self.connection,
            ConnectionState::Connected | ConnectionState::Subscribed
        )
    }
}
