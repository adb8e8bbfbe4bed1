//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use url::Url;

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: String,
    pub(crate) allowed_origins: Vec<Url>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr,
            jwt_secret: jwt_secret.into(),
            allowed_origins: Vec::new(),
            db_pool: None,
        }
    }

    /// Origins accepted on WebSocket upgrades, in addition to localhost
    /// during development.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<Url>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// Attach a database pool. Without one the server runs on the in-memory
    /// fixtures, which is the mode tests use.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
