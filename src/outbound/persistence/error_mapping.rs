//! Shared mapping from pool and Diesel failures to the store port error.

use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::EquipmentPersistenceError;

pub fn map_pool_error(error: PoolError) -> EquipmentPersistenceError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    EquipmentPersistenceError::connection(message)
}

/// Map a Diesel failure, promoting unique violations on the serial column
/// to `DuplicateSerialNo` when a serial is supplied.
pub fn map_diesel_error(
    error: diesel::result::Error,
    serial_no: Option<&str>,
) -> EquipmentPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => match serial_no {
            Some(serial_no) => EquipmentPersistenceError::duplicate_serial_no(serial_no),
            None => EquipmentPersistenceError::query("unique constraint violation"),
        },
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            EquipmentPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => EquipmentPersistenceError::query("database error"),
        DieselError::NotFound => EquipmentPersistenceError::query("record not found"),
        _ => EquipmentPersistenceError::query("database error"),
    }
}
