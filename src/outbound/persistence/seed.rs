//! Example data seeding for local development.
//!
//! Inserts three accounts (one per role) and a small equipment catalog.
//! Every insert is `ON CONFLICT DO NOTHING`, so re-running the seed against
//! an already-populated database is harmless.

use diesel_async::RunQueryDsl;
use tracing::info;

use super::models::{NewEquipmentRow, NewUserRow};
use super::pool::DbPool;
use super::schema::{equipments, users};
use crate::domain::Error;
use crate::domain::ports::FIXTURE_ACCOUNTS;

struct SeedEquipment {
    serial_no: &'static str,
    name: &'static str,
    category: &'static str,
    status: &'static str,
}

const SEED_EQUIPMENT: [SeedEquipment; 6] = [
    SeedEquipment {
        serial_no: "MB-001",
        name: "MacBook Pro 14\"",
        category: "Notebook",
        status: "available",
    },
    SeedEquipment {
        serial_no: "MB-002",
        name: "MacBook Pro 14\"",
        category: "Notebook",
        status: "borrowed",
    },
    SeedEquipment {
        serial_no: "IP-001",
        name: "iPad Air 5th Gen",
        category: "Tablet",
        status: "available",
    },
    SeedEquipment {
        serial_no: "IP-002",
        name: "iPad Air 5th Gen",
        category: "Tablet",
        status: "available",
    },
    SeedEquipment {
        serial_no: "DL-001",
        name: "Dell Monitor 27\"",
        category: "Monitor",
        status: "maintenance",
    },
    SeedEquipment {
        serial_no: "LG-001",
        name: "Logitech Webcam",
        category: "Peripheral",
        status: "available",
    },
];

/// Seed the fixture accounts and example catalog.
pub async fn seed_example_data(pool: &DbPool) -> Result<(), Error> {
    let mut conn = pool
        .get()
        .await
        .map_err(|err| Error::store_unavailable(err.to_string()))?;

    for (email, password, name, role) in FIXTURE_ACCOUNTS {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|err| Error::internal(format!("failed to hash seed password: {err}")))?;
        diesel::insert_into(users::table)
            .values(NewUserRow {
                email,
                name,
                role: role.as_str(),
                password_hash: &password_hash,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| Error::internal(format!("failed to seed user {email}: {err}")))?;
    }
    info!(accounts = FIXTURE_ACCOUNTS.len(), "seeded fixture accounts");

    for item in &SEED_EQUIPMENT {
        diesel::insert_into(equipments::table)
            .values((
                NewEquipmentRow {
                    serial_no: item.serial_no,
                    name: item.name,
                    category: item.category,
                    status: item.status,
                },
            ))
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| {
                Error::internal(format!("failed to seed equipment {}: {err}", item.serial_no))
            })?;
    }
    info!(records = SEED_EQUIPMENT.len(), "seeded example catalog");

    Ok(())
}
