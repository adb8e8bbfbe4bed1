//! Change events broadcast after committed transitions.

use serde::{Deserialize, Serialize};

use crate::domain::EquipmentStatus;

/// Payload broadcast once per committed status transition.
///
/// Carries only the fields that changed, not the full record; a consumer
/// that misses an event must re-read the store rather than replay the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub equipment_id: i32,
    pub new_status: EquipmentStatus,
    pub borrowed_by: Option<String>,
}
