//! Equipment API handlers.
//!
//! ```text
//! GET    /api/equipments
//! POST   /api/equipments
//! PATCH  /api/equipments/{id}
//! DELETE /api/equipments/{id}
//! ```
//!
//! All routes require a bearer token. Role rules live in the domain
//! services; handlers only translate between HTTP and domain types.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Equipment, EquipmentStatus, EquipmentValidationError, Error, NewEquipment, TransitionRequest,
};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Body of `POST /api/equipments`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentRequest {
    pub name: String,
    pub category: String,
    pub serial_no: String,
}

/// Body of `PATCH /api/equipments/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: EquipmentStatus,
    #[serde(default)]
    pub borrowed_by: Option<String>,
}

/// List the catalog, newest first.
#[utoipa::path(
    get,
    path = "/api/equipments",
    responses(
        (status = 200, description = "Equipment list", body = [Equipment]),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError)
    ),
    tags = ["equipment"],
    operation_id = "listEquipment"
)]
#[get("/equipments")]
pub async fn list_equipment(
    state: web::Data<HttpState>,
    _identity: Identity,
) -> ApiResult<web::Json<Vec<Equipment>>> {
    Ok(web::Json(state.catalog.list().await?))
}

/// Register a new catalog entry. Admins and teachers only.
#[utoipa::path(
    post,
    path = "/api/equipments",
    request_body = CreateEquipmentRequest,
    responses(
        (status = 201, description = "Equipment registered", body = Equipment),
        (status = 400, description = "Validation failed or duplicate serial", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Caller is not staff", body = ApiError)
    ),
    tags = ["equipment"],
    operation_id = "createEquipment"
)]
#[post("/equipments")]
pub async fn create_equipment(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<CreateEquipmentRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let draft = NewEquipment::try_from_parts(&body.name, &body.category, &body.serial_no)
        .map_err(map_validation_error)?;
    let record = state.catalog.register(&draft, identity.role).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Change an equipment record's status.
#[utoipa::path(
    patch,
    path = "/api/equipments/{id}",
    request_body = UpdateStatusRequest,
    params(("id" = i32, Path, description = "Equipment identifier")),
    responses(
        (status = 200, description = "Post-commit record", body = Equipment),
        (status = 400, description = "Borrower missing for a borrow", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Role may not perform this transition", body = ApiError),
        (status = 404, description = "Unknown equipment", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError)
    ),
    tags = ["equipment"],
    operation_id = "updateEquipmentStatus"
)]
#[patch("/equipments/{id}")]
pub async fn update_equipment_status(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<i32>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<Equipment>> {
    let body = payload.into_inner();
    let record = state
        .transitions
        .apply_transition(TransitionRequest {
            equipment_id: path.into_inner(),
            requested_status: body.status,
            actor_role: identity.role,
            borrowed_by_hint: body.borrowed_by,
        })
        .await?;
    Ok(web::Json(record))
}

/// Retire an available record. Admins only.
#[utoipa::path(
    delete,
    path = "/api/equipments/{id}",
    params(("id" = i32, Path, description = "Equipment identifier")),
    responses(
        (status = 200, description = "Equipment retired"),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Caller is not an admin", body = ApiError),
        (status = 404, description = "Unknown equipment", body = ApiError),
        (status = 409, description = "Equipment is borrowed or in maintenance", body = ApiError)
    ),
    tags = ["equipment"],
    operation_id = "deleteEquipment"
)]
#[delete("/equipments/{id}")]
pub async fn delete_equipment(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .catalog
        .retire(path.into_inner(), identity.role)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Equipment deleted successfully" })))
}

fn map_validation_error(err: EquipmentValidationError) -> Error {
    let message = match err {
        EquipmentValidationError::NameTooShort => "name must be at least 2 characters",
        EquipmentValidationError::CategoryTooShort => "category must be at least 2 characters",
        EquipmentValidationError::SerialNoTooShort => "serialNo must be at least 3 characters",
    };
    Error::invalid_request(message).with_details(json!({ "field": err.field() }))
}
