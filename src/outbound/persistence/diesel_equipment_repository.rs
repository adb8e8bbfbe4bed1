//! Diesel-backed equipment store adapter.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EquipmentRow, NewEquipmentRow};
use super::pool::DbPool;
use super::schema::equipments;
use crate::domain::ports::{DeleteOutcome, EquipmentPersistenceError, EquipmentRepository};
use crate::domain::{Equipment, EquipmentStatus, NewEquipment};

/// PostgreSQL implementation of the equipment store port.
#[derive(Clone)]
pub struct DieselEquipmentRepository {
    pool: DbPool,
}

impl DieselEquipmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentRepository for DieselEquipmentRepository {
    async fn list(&self) -> Result<Vec<Equipment>, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = equipments::table
            .select(EquipmentRow::as_select())
            .order((equipments::created_at.desc(), equipments::id.desc()))
            .load::<EquipmentRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        rows.into_iter().map(EquipmentRow::into_domain).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = equipments::table
            .filter(equipments::id.eq(id))
            .select(EquipmentRow::as_select())
            .first::<EquipmentRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(EquipmentRow::into_domain).transpose()
    }

    async fn insert(&self, draft: &NewEquipment) -> Result<Equipment, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(equipments::table)
            .values(NewEquipmentRow {
                serial_no: draft.serial_no(),
                name: draft.name(),
                category: draft.category(),
                status: EquipmentStatus::Available.as_str(),
            })
            .returning(EquipmentRow::as_select())
            .get_result::<EquipmentRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(draft.serial_no())))?;
        row.into_domain()
    }

    async fn update_status(
        &self,
        id: i32,
        status: EquipmentStatus,
        borrowed_by: Option<String>,
    ) -> Result<Option<Equipment>, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(equipments::table.filter(equipments::id.eq(id)))
            .set((
                equipments::status.eq(status.as_str()),
                equipments::borrowed_by.eq(borrowed_by),
                equipments::updated_at.eq(Utc::now()),
            ))
            .returning(EquipmentRow::as_select())
            .get_result::<EquipmentRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(EquipmentRow::into_domain).transpose()
    }

    async fn delete_available(&self, id: i32) -> Result<DeleteOutcome, EquipmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            equipments::table
                .filter(equipments::id.eq(id))
                .filter(equipments::status.eq(EquipmentStatus::Available.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))?;

        if deleted > 0 {
            return Ok(DeleteOutcome::Deleted);
        }

        // Nothing matched; distinguish a missing row from a guarded one.
        let exists = equipments::table
            .filter(equipments::id.eq(id))
            .select(equipments::id)
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(match exists {
            Some(_) => DeleteOutcome::NotAvailable,
            None => DeleteOutcome::NotFound,
        })
    }
}
