//! Domain model: equipment records, status transitions, users, and the
//! ports that adapters implement. Nothing in here knows about HTTP,
//! WebSockets, or Diesel.

mod catalog;
mod equipment;
mod error;
mod events;
pub mod ports;
mod transition;
mod user;

pub use catalog::CatalogService;
pub use equipment::{
    Equipment, EquipmentStatus, EquipmentValidationError, NewEquipment, UnknownStatus,
};
pub use error::{Error, ErrorCode};
pub use events::ChangeEvent;
pub use transition::{TransitionAuthority, TransitionRequest};
pub use user::{LoginCredentials, LoginValidationError, Role, UnknownRole, User};
