//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data` and only depend
//! on domain services and ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::LoginService;
use crate::domain::{CatalogService, TransitionAuthority};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub catalog: Arc<CatalogService>,
    pub transitions: Arc<TransitionAuthority>,
}

impl HttpState {
    pub fn new(
        login: Arc<dyn LoginService>,
        catalog: Arc<CatalogService>,
        transitions: Arc<TransitionAuthority>,
    ) -> Self {
        Self {
            login,
            catalog,
            transitions,
        }
    }
}
