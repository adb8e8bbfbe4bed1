//! The single decision point for equipment status changes.
//!
//! Every status write flows through [`TransitionAuthority::apply_transition`]:
//! it authorizes the request against the actor's role, reconciles the borrower
//! field with the target status, commits through the store port, and only then
//! hands the change to the notification bus. Nothing is ever published for a
//! write that did not commit.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{ChangePublisher, EquipmentRepository};
use crate::domain::{ChangeEvent, Equipment, EquipmentStatus, Error, Role};

/// A requested status change, already authenticated upstream.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub equipment_id: i32,
    pub requested_status: EquipmentStatus,
    pub actor_role: Role,
    /// Display name of the borrower, required when borrowing and discarded
    /// for every other target status.
    pub borrowed_by_hint: Option<String>,
}

/// Applies status transitions and fans the committed result out to the bus.
pub struct TransitionAuthority {
    repository: Arc<dyn EquipmentRepository>,
    publisher: Arc<dyn ChangePublisher>,
}

impl TransitionAuthority {
    pub fn new(
        repository: Arc<dyn EquipmentRepository>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Authorize, commit, and broadcast one status transition.
    ///
    /// Returns the post-commit record. Repeating the current status is a
    /// valid transition: the record's `updated_at` still moves and an event
    /// is still broadcast.
    pub async fn apply_transition(&self, request: TransitionRequest) -> Result<Equipment, Error> {
        let current = self
            .repository
            .find_by_id(request.equipment_id)
            .await?
            .ok_or_else(|| Error::not_found("equipment not found"))?;

        authorize(current.status, request.requested_status, request.actor_role)?;
        let borrowed_by = resolve_borrower(request.requested_status, request.borrowed_by_hint)?;

        let updated = self
            .repository
            .update_status(request.equipment_id, request.requested_status, borrowed_by)
            .await?
            .ok_or_else(|| Error::not_found("equipment not found"))?;

        info!(
            equipment_id = updated.id,
            from = current.status.as_str(),
            to = updated.status.as_str(),
            role = request.actor_role.as_str(),
            "status transition committed"
        );
        self.publisher.publish(ChangeEvent {
            equipment_id: updated.id,
            new_status: updated.status,
            borrowed_by: updated.borrowed_by.clone(),
        });
        Ok(updated)
    }
}

/// Role gate: placing equipment into maintenance, or releasing it back to
/// available, is reserved for admins and teachers. Every other pair of
/// statuses is open to any authenticated role.
fn authorize(current: EquipmentStatus, requested: EquipmentStatus, role: Role) -> Result<(), Error> {
    if requested == EquipmentStatus::Maintenance && !role.is_staff() {
        return Err(Error::forbidden(
            "only admins and teachers may flag equipment for maintenance",
        ));
    }
    if current == EquipmentStatus::Maintenance
        && requested == EquipmentStatus::Available
        && !role.is_staff()
    {
        return Err(Error::forbidden(
            "only admins and teachers may release equipment from maintenance",
        ));
    }
    Ok(())
}

/// Couple the borrower field to the target status: borrowing requires a
/// non-empty name, every other target clears the field regardless of what
/// the client sent.
fn resolve_borrower(
    requested: EquipmentStatus,
    hint: Option<String>,
) -> Result<Option<String>, Error> {
    if requested != EquipmentStatus::Borrowed {
        return Ok(None);
    }
    hint.map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .map(Some)
        .ok_or_else(|| Error::invalid_request("borrowedBy is required when status is borrowed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        EquipmentPersistenceError, MockChangePublisher, MockEquipmentRepository,
    };
    use chrono::Utc;
    use rstest::rstest;

    fn record(id: i32, status: EquipmentStatus, borrowed_by: Option<&str>) -> Equipment {
        let now = Utc::now();
        Equipment {
            id,
            serial_no: format!("MB-{id:03}"),
            name: "MacBook Pro".into(),
            category: "Notebook".into(),
            status,
            borrowed_by: borrowed_by.map(str::to_owned),
            created_at: now,
            updated_at: now,
        }
    }

    fn authority(
        repository: MockEquipmentRepository,
        publisher: MockChangePublisher,
    ) -> TransitionAuthority {
        TransitionAuthority::new(Arc::new(repository), Arc::new(publisher))
    }

    fn request(
        requested_status: EquipmentStatus,
        actor_role: Role,
        borrowed_by_hint: Option<&str>,
    ) -> TransitionRequest {
        TransitionRequest {
            equipment_id: 1,
            requested_status,
            actor_role,
            borrowed_by_hint: borrowed_by_hint.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn borrow_commits_then_publishes_exactly_once() {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Available, None))));
        repository
            .expect_update_status()
            .withf(|id, status, borrowed_by| {
                *id == 1
                    && *status == EquipmentStatus::Borrowed
                    && borrowed_by.as_deref() == Some("Jane")
            })
            .return_once(|_, _, _| Ok(Some(record(1, EquipmentStatus::Borrowed, Some("Jane")))));

        let mut publisher = MockChangePublisher::new();
        publisher
            .expect_publish()
            .withf(|event| {
                event.equipment_id == 1
                    && event.new_status == EquipmentStatus::Borrowed
                    && event.borrowed_by.as_deref() == Some("Jane")
            })
            .times(1)
            .return_const(());

        let updated = authority(repository, publisher)
            .apply_transition(request(
                EquipmentStatus::Borrowed,
                Role::Student,
                Some("  Jane  "),
            ))
            .await
            .expect("transition commits");
        assert_eq!(updated.status, EquipmentStatus::Borrowed);
    }

    #[rstest]
    #[case(EquipmentStatus::Available, None)]
    #[case(EquipmentStatus::Maintenance, Some("Jane"))]
    #[tokio::test]
    async fn non_borrow_targets_clear_the_borrower(
        #[case] requested: EquipmentStatus,
        #[case] hint: Option<&str>,
    ) {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Borrowed, Some("Jane")))));
        repository
            .expect_update_status()
            .withf(move |_, status, borrowed_by| *status == requested && borrowed_by.is_none())
            .return_once(move |_, status, _| Ok(Some(record(1, status, None))));

        let mut publisher = MockChangePublisher::new();
        publisher
            .expect_publish()
            .withf(|event| event.borrowed_by.is_none())
            .times(1)
            .return_const(());

        authority(repository, publisher)
            .apply_transition(request(requested, Role::Teacher, hint))
            .await
            .expect("transition commits");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    #[tokio::test]
    async fn borrow_without_borrower_is_rejected_before_the_write(#[case] hint: Option<&str>) {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Available, None))));
        repository.expect_update_status().never();

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().never();

        let err = authority(repository, publisher)
            .apply_transition(request(EquipmentStatus::Borrowed, Role::Student, hint))
            .await
            .expect_err("missing borrower must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn student_cannot_flag_maintenance() {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Available, None))));
        repository.expect_update_status().never();

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().never();

        let err = authority(repository, publisher)
            .apply_transition(request(EquipmentStatus::Maintenance, Role::Student, None))
            .await
            .expect_err("student must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn student_cannot_release_maintenance() {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Maintenance, None))));
        repository.expect_update_status().never();

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().never();

        let err = authority(repository, publisher)
            .apply_transition(request(EquipmentStatus::Available, Role::Student, None))
            .await
            .expect_err("student must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Teacher)]
    #[tokio::test]
    async fn staff_can_release_maintenance(#[case] role: Role) {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Maintenance, None))));
        repository
            .expect_update_status()
            .return_once(|_, _, _| Ok(Some(record(1, EquipmentStatus::Available, None))));

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().times(1).return_const(());

        authority(repository, publisher)
            .apply_transition(request(EquipmentStatus::Available, role, None))
            .await
            .expect("staff release commits");
    }

    #[tokio::test]
    async fn student_can_borrow_out_of_maintenance() {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Maintenance, None))));
        repository
            .expect_update_status()
            .return_once(|_, _, _| Ok(Some(record(1, EquipmentStatus::Borrowed, Some("Jane")))));

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().times(1).return_const(());

        authority(repository, publisher)
            .apply_transition(request(
                EquipmentStatus::Borrowed,
                Role::Student,
                Some("Jane"),
            ))
            .await
            .expect("borrow out of maintenance is permitted");
    }

    #[tokio::test]
    async fn unknown_equipment_is_not_found() {
        let mut repository = MockEquipmentRepository::new();
        repository.expect_find_by_id().return_once(|_| Ok(None));
        repository.expect_update_status().never();

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().never();

        let err = authority(repository, publisher)
            .apply_transition(request(EquipmentStatus::Available, Role::Admin, None))
            .await
            .expect_err("unknown id must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn failed_write_publishes_nothing() {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Available, None))));
        repository
            .expect_update_status()
            .return_once(|_, _, _| Err(EquipmentPersistenceError::connection("pool exhausted")));

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().never();

        let err = authority(repository, publisher)
            .apply_transition(request(EquipmentStatus::Available, Role::Admin, None))
            .await
            .expect_err("store failure must surface");
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
    }

    #[tokio::test]
    async fn repeating_the_current_status_still_broadcasts() {
        let mut repository = MockEquipmentRepository::new();
        repository
            .expect_find_by_id()
            .return_once(|_| Ok(Some(record(1, EquipmentStatus::Available, None))));
        repository
            .expect_update_status()
            .return_once(|_, _, _| Ok(Some(record(1, EquipmentStatus::Available, None))));

        let mut publisher = MockChangePublisher::new();
        publisher.expect_publish().times(1).return_const(());

        authority(repository, publisher)
            .apply_transition(request(EquipmentStatus::Available, Role::Student, None))
            .await
            .expect("no-op transition commits");
    }
}
