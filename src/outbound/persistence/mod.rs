//! PostgreSQL persistence adapters behind the domain ports.

mod diesel_equipment_repository;
mod diesel_login_service;
mod error_mapping;
mod models;
pub mod pool;
pub mod schema;
mod seed;

pub use diesel_equipment_repository::DieselEquipmentRepository;
pub use diesel_login_service::DieselLoginService;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use seed::seed_example_data;
