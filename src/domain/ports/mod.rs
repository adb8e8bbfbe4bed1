//! Domain ports and supporting types for the hexagonal boundary.

mod change_publisher;
mod equipment_repository;
mod login_service;

#[cfg(test)]
pub use change_publisher::MockChangePublisher;
pub use change_publisher::{ChangePublisher, NullChangePublisher};
#[cfg(test)]
pub use equipment_repository::MockEquipmentRepository;
pub use equipment_repository::{
    DeleteOutcome, EquipmentPersistenceError, EquipmentRepository, InMemoryEquipmentRepository,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_ACCOUNTS, FixtureLoginService, LoginService};
