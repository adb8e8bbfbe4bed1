//! HTTP adapter: REST handlers, bearer authentication, and error mapping.

pub mod auth;
pub mod equipment;
pub mod error;
pub mod health;
pub mod identity;
pub mod state;
pub mod token;

pub use error::{ApiError, ApiResult, TRACE_ID_HEADER};
pub use identity::Identity;
pub use state::HttpState;
pub use token::TokenCodec;

use actix_web::web;

/// Mount every REST handler under the given scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(auth::login)
        .service(equipment::list_equipment)
        .service(equipment::create_equipment)
        .service(equipment::update_equipment_status)
        .service(equipment::delete_equipment);
}
