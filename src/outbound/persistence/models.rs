//! Row types bridging the Diesel schema and domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{equipments, users};
use crate::domain::ports::EquipmentPersistenceError;
use crate::domain::{Equipment, EquipmentStatus, Role, User};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = equipments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EquipmentRow {
    pub id: i32,
    pub serial_no: String,
    pub name: String,
    pub category: String,
    pub status: String,
    pub borrowed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EquipmentRow {
    /// Convert into the domain record. A status value the enum does not
    /// know means the row was written outside this application.
    pub fn into_domain(self) -> Result<Equipment, EquipmentPersistenceError> {
        let status = self.status.parse::<EquipmentStatus>().map_err(|err| {
            EquipmentPersistenceError::query(format!("stored status is invalid: {err}"))
        })?;
        Ok(Equipment {
            id: self.id,
            serial_no: self.serial_no,
            name: self.name,
            category: self.category,
            status,
            borrowed_by: self.borrowed_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = equipments)]
pub struct NewEquipmentRow<'a> {
    pub serial_no: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
}

impl UserRow {
    pub fn into_domain(self) -> Result<User, EquipmentPersistenceError> {
        let role = self.role.parse::<Role>().map_err(|err| {
            EquipmentPersistenceError::query(format!("stored role is invalid: {err}"))
        })?;
        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            role,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}
