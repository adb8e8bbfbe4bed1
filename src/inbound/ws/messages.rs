//! Wire payloads for the realtime channel.
//!
//! Both directions use tagged JSON. Clients send control messages; the
//! server only ever pushes status change notifications.

use serde::{Deserialize, Serialize};

use crate::domain::{ChangeEvent, EquipmentStatus};

/// Messages a client may send after the upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join a broadcast group. Membership is never automatic and does not
    /// survive a reconnect.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room: String },
}

/// Messages pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// One committed status transition.
    #[serde(rename_all = "camelCase")]
    EquipmentStatusChanged {
        equipment_id: i32,
        new_status: EquipmentStatus,
        borrowed_by: Option<String>,
    },
}

impl From<ChangeEvent> for ServerMessage {
    fn from(event: ChangeEvent) -> Self {
        Self::EquipmentStatusChanged {
            equipment_id: event.equipment_id,
            new_status: event.new_status,
            borrowed_by: event.borrowed_by,
        }
    }
}
