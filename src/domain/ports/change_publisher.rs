//! Driven port for the change notification bus.

use crate::domain::ChangeEvent;

/// Publisher side of the notification bus.
///
/// Publication is fire-and-forget: the bus owns no durable state and gives
/// no delivery guarantee, so implementations must never fail the calling
/// transition. Consumers that miss an event re-read the store.
#[cfg_attr(test, mockall::automock)]
pub trait ChangePublisher: Send + Sync {
    /// Deliver the event to every currently-subscribed connection.
    fn publish(&self, event: ChangeEvent);
}

/// Publisher that drops every event; used where no bus is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChangePublisher;

impl ChangePublisher for NullChangePublisher {
    fn publish(&self, _event: ChangeEvent) {}
}
