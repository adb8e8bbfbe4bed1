//! Driven port for the equipment store.
//!
//! The transition authority and catalog service depend on this trait, never
//! on a concrete store. Production backs it with Diesel; tests and
//! no-database operation use [`InMemoryEquipmentRepository`].

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::domain::{Equipment, EquipmentStatus, Error, NewEquipment};

/// Persistence errors raised by equipment store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EquipmentPersistenceError {
    /// Store connection could not be established; nothing was applied.
    #[error("equipment store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("equipment store query failed: {message}")]
    Query { message: String },
    /// Insert violated the unique serial number constraint.
    #[error("serial number already registered: {serial_no}")]
    DuplicateSerialNo { serial_no: String },
}

impl EquipmentPersistenceError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn duplicate_serial_no(serial_no: impl Into<String>) -> Self {
        Self::DuplicateSerialNo {
            serial_no: serial_no.into(),
        }
    }
}

impl From<EquipmentPersistenceError> for Error {
    fn from(error: EquipmentPersistenceError) -> Self {
        match error {
            EquipmentPersistenceError::Connection { .. } => {
                Error::store_unavailable("equipment store is unavailable")
            }
            EquipmentPersistenceError::Query { .. } => {
                Error::internal("equipment store query failed")
            }
            EquipmentPersistenceError::DuplicateSerialNo { serial_no } => {
                Error::invalid_request("serial number is already registered")
                    .with_details(serde_json::json!({ "serialNo": serial_no }))
            }
        }
    }
}

/// Result of a guarded delete. Deletion is restricted to available records,
/// so the adapter must report which precondition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    NotAvailable,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    /// List all equipment, most recently created first.
    async fn list(&self) -> Result<Vec<Equipment>, EquipmentPersistenceError>;

    /// Fetch a record by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Equipment>, EquipmentPersistenceError>;

    /// Insert a new catalog entry; the store assigns the identifier.
    async fn insert(&self, draft: &NewEquipment) -> Result<Equipment, EquipmentPersistenceError>;

    /// Write the new status and borrower, bumping `updated_at`. Returns the
    /// post-commit record, or `None` when the id is unknown.
    async fn update_status(
        &self,
        id: i32,
        status: EquipmentStatus,
        borrowed_by: Option<String>,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError>;

    /// Delete the record only while its status is available.
    async fn delete_available(&self, id: i32) -> Result<DeleteOutcome, EquipmentPersistenceError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    records: Vec<Equipment>,
    next_id: i32,
}

/// In-memory equipment store used by tests and no-database operation.
#[derive(Debug, Default)]
pub struct InMemoryEquipmentRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryEquipmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-built records, advancing the id counter past
    /// the largest seeded id.
    pub fn with_records(records: Vec<Equipment>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            state: Mutex::new(InMemoryState { records, next_id }),
        }
    }
}

#[async_trait]
impl EquipmentRepository for InMemoryEquipmentRepository {
    async fn list(&self) -> Result<Vec<Equipment>, EquipmentPersistenceError> {
        let state = self.state.lock().expect("state lock");
        let mut records = state.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let state = self.state.lock().expect("state lock");
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, draft: &NewEquipment) -> Result<Equipment, EquipmentPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        if state.records.iter().any(|r| r.serial_no == draft.serial_no()) {
            return Err(EquipmentPersistenceError::duplicate_serial_no(
                draft.serial_no(),
            ));
        }

        state.next_id += 1;
        let now = Utc::now();
        let record = Equipment {
            id: state.next_id,
            serial_no: draft.serial_no().to_owned(),
            name: draft.name().to_owned(),
            category: draft.category().to_owned(),
            status: EquipmentStatus::Available,
            borrowed_by: None,
            created_at: now,
            updated_at: now,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update_status(
        &self,
        id: i32,
        status: EquipmentStatus,
        borrowed_by: Option<String>,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        let Some(record) = state.records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.status = status;
        record.borrowed_by = borrowed_by;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete_available(&self, id: i32) -> Result<DeleteOutcome, EquipmentPersistenceError> {
        let mut state = self.state.lock().expect("state lock");
        let Some(index) = state.records.iter().position(|r| r.id == id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        if state.records[index].status != EquipmentStatus::Available {
            return Ok(DeleteOutcome::NotAvailable);
        }
        state.records.remove(index);
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(serial_no: &str) -> NewEquipment {
        NewEquipment::try_from_parts("MacBook Pro", "Notebook", serial_no).expect("valid draft")
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_defaults() {
        let repo = InMemoryEquipmentRepository::new();
        let first = repo.insert(&draft("MB-001")).await.expect("insert");
        let second = repo.insert(&draft("MB-002")).await.expect("insert");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, EquipmentStatus::Available);
        assert_eq!(first.borrowed_by, None);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_serial() {
        let repo = InMemoryEquipmentRepository::new();
        repo.insert(&draft("MB-001")).await.expect("insert");

        let err = repo
            .insert(&draft("MB-001"))
            .await
            .expect_err("duplicate serial must fail");
        assert_eq!(
            err,
            EquipmentPersistenceError::duplicate_serial_no("MB-001")
        );
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let repo = InMemoryEquipmentRepository::new();
        repo.insert(&draft("MB-001")).await.expect("insert");
        repo.insert(&draft("MB-002")).await.expect("insert");

        let listed = repo.list().await.expect("list");
        let serials: Vec<_> = listed.iter().map(|r| r.serial_no.as_str()).collect();
        assert_eq!(serials, vec!["MB-002", "MB-001"]);
    }

    #[tokio::test]
    async fn update_status_bumps_updated_at() {
        let repo = InMemoryEquipmentRepository::new();
        let created = repo.insert(&draft("MB-001")).await.expect("insert");

        let updated = repo
            .update_status(created.id, EquipmentStatus::Borrowed, Some("Jane".into()))
            .await
            .expect("update")
            .expect("record exists");
        assert_eq!(updated.status, EquipmentStatus::Borrowed);
        assert_eq!(updated.borrowed_by.as_deref(), Some("Jane"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_status_unknown_id_is_none() {
        let repo = InMemoryEquipmentRepository::new();
        let result = repo
            .update_status(99, EquipmentStatus::Available, None)
            .await
            .expect("update");
        assert!(result.is_none());
    }

    #[rstest]
    #[case(EquipmentStatus::Available, DeleteOutcome::Deleted)]
    #[case(EquipmentStatus::Borrowed, DeleteOutcome::NotAvailable)]
    #[case(EquipmentStatus::Maintenance, DeleteOutcome::NotAvailable)]
    #[tokio::test]
    async fn delete_is_guarded_by_status(
        #[case] status: EquipmentStatus,
        #[case] expected: DeleteOutcome,
    ) {
        let repo = InMemoryEquipmentRepository::new();
        let created = repo.insert(&draft("MB-001")).await.expect("insert");
        let borrower = matches!(status, EquipmentStatus::Borrowed).then(|| "Jane".to_owned());
        repo.update_status(created.id, status, borrower)
            .await
            .expect("update");

        let outcome = repo.delete_available(created.id).await.expect("delete");
        assert_eq!(outcome, expected);

        let remaining = repo.find_by_id(created.id).await.expect("find");
        assert_eq!(remaining.is_some(), expected != DeleteOutcome::Deleted);
    }

    #[tokio::test]
    async fn delete_unknown_id_reports_not_found() {
        let repo = InMemoryEquipmentRepository::new();
        let outcome = repo.delete_available(42).await.expect("delete");
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }
}
