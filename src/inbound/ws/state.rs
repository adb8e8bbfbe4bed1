//! Shared state for the WebSocket adapter.

use url::Url;

use crate::outbound::broadcast::EquipmentBroadcast;

/// Dependencies handed to each WebSocket session.
#[derive(Clone)]
pub struct WsState {
    pub bus: EquipmentBroadcast,
    pub allowed_origins: Vec<Url>,
}

impl WsState {
    pub fn new(bus: EquipmentBroadcast, allowed_origins: Vec<Url>) -> Self {
        Self {
            bus,
            allowed_origins,
        }
    }
}
