//! Outbound adapters: persistence and the broadcast bus.

pub mod broadcast;
pub mod persistence;
