//! Catalog operations over the equipment store: listing, registration,
//! and guarded retirement. Status changes live in [`crate::domain::transition`].

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{DeleteOutcome, EquipmentRepository};
use crate::domain::{Equipment, Error, NewEquipment, Role};

pub struct CatalogService {
    repository: Arc<dyn EquipmentRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn EquipmentRepository>) -> Self {
        Self { repository }
    }

    /// List the full catalog, most recently registered first.
    pub async fn list(&self) -> Result<Vec<Equipment>, Error> {
        Ok(self.repository.list().await?)
    }

    /// Fetch one record by identifier.
    pub async fn find(&self, id: i32) -> Result<Equipment, Error> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("equipment not found"))
    }

    /// Register a new catalog entry. Admins and teachers only; new entries
    /// always start as available with no borrower.
    pub async fn register(&self, draft: &NewEquipment, actor_role: Role) -> Result<Equipment, Error> {
        if !actor_role.is_staff() {
            return Err(Error::forbidden(
                "only admins and teachers may register equipment",
            ));
        }
        let record = self.repository.insert(draft).await?;
        info!(equipment_id = record.id, serial_no = %record.serial_no, "equipment registered");
        Ok(record)
    }

    /// Retire a record. Admin only, and only while the record is available;
    /// borrowed or maintenance equipment must be released first.
    pub async fn retire(&self, id: i32, actor_role: Role) -> Result<(), Error> {
        if actor_role != Role::Admin {
            return Err(Error::forbidden("only admins may retire equipment"));
        }
        match self.repository.delete_available(id).await? {
            DeleteOutcome::Deleted => {
                info!(equipment_id = id, "equipment retired");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(Error::not_found("equipment not found")),
            DeleteOutcome::NotAvailable => Err(Error::conflict(
                "equipment must be available before it can be retired",
            )),
        }
    }
}
