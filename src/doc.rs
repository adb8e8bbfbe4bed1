//! OpenAPI documentation configuration.
//!
//! Generates the specification served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Equipment, EquipmentStatus, ErrorCode, Role, User};
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::equipment::{CreateEquipmentRequest, UpdateStatusRequest};
use crate::inbound::http::error::ApiError;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Quartermaster API",
        description = "Equipment checkout tracking with realtime status fan-out."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::equipment::list_equipment,
        crate::inbound::http::equipment::create_equipment,
        crate::inbound::http::equipment::update_equipment_status,
        crate::inbound::http::equipment::delete_equipment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Equipment,
        EquipmentStatus,
        User,
        Role,
        ApiError,
        ErrorCode,
        LoginRequest,
        LoginResponse,
        CreateEquipmentRequest,
        UpdateStatusRequest,
    )),
    tags(
        (name = "auth", description = "Authentication"),
        (name = "equipment", description = "Equipment catalog and status transitions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_equipment_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/api/equipments".to_owned()));
        assert!(paths.contains(&"/api/equipments/{id}".to_owned()));
        assert!(paths.contains(&"/api/auth/login".to_owned()));
    }
}
