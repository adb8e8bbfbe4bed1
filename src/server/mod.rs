//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    ChangePublisher, EquipmentRepository, FixtureLoginService, InMemoryEquipmentRepository,
    LoginService,
};
use crate::domain::{CatalogService, TransitionAuthority};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::{HttpState, TokenCodec, configure_api};
use crate::inbound::ws::{self, WsState};
use crate::middleware::Trace;
use crate::outbound::broadcast::EquipmentBroadcast;
use crate::outbound::persistence::{DieselEquipmentRepository, DieselLoginService};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    token_codec: web::Data<TokenCodec>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
        token_codec,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .app_data(token_codec)
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

fn build_http_state(config: &ServerConfig, bus: &EquipmentBroadcast) -> HttpState {
    let repository: Arc<dyn EquipmentRepository> = match &config.db_pool {
        Some(pool) => Arc::new(DieselEquipmentRepository::new(pool.clone())),
        None => Arc::new(InMemoryEquipmentRepository::new()),
    };
    let login: Arc<dyn LoginService> = match &config.db_pool {
        Some(pool) => Arc::new(DieselLoginService::new(pool.clone())),
        None => Arc::new(FixtureLoginService),
    };
    let publisher: Arc<dyn ChangePublisher> = Arc::new(bus.clone());

    HttpState::new(
        login,
        Arc::new(CatalogService::new(repository.clone())),
        Arc::new(TransitionAuthority::new(repository, publisher)),
    )
}

/// Construct the HTTP server: REST under `/api`, the WebSocket entry at
/// `/ws`, and health probes. Readiness is marked once the listener binds.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let bus = EquipmentBroadcast::new();
    let http_state = web::Data::new(build_http_state(&config, &bus));
    let ws_state = web::Data::new(WsState::new(bus, config.allowed_origins.clone()));
    let token_codec = web::Data::new(TokenCodec::new(config.jwt_secret.clone()));
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            token_codec: token_codec.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
