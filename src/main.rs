//! Application entry-point: configuration, store wiring, and server startup.

use actix_web::web;
use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use quartermaster::inbound::http::health::HealthState;
use quartermaster::outbound::persistence::{DbPool, PoolConfig, seed_example_data};
use quartermaster::server::{ServerConfig, create_server};

#[derive(Debug, Parser)]
#[command(name = "quartermaster", about = "Equipment checkout tracking service")]
struct AppConfig {
    /// Socket address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// PostgreSQL connection string. Without it the server runs on
    /// in-memory fixtures (development and tests only).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Secret used to sign bearer tokens.
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Additional origins accepted on WebSocket upgrades.
    #[arg(long = "allowed-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<Url>,

    /// Seed the fixture accounts and example catalog, then continue serving.
    #[arg(long)]
    seed: bool,
}

fn resolve_jwt_secret(configured: Option<String>) -> std::io::Result<String> {
    match configured {
        Some(secret) if !secret.trim().is_empty() => Ok(secret),
        _ if cfg!(debug_assertions) => {
            warn!("JWT_SECRET not set; using an ephemeral dev secret");
            Ok("quartermaster-dev-secret".to_owned())
        }
        _ => Err(std::io::Error::other("JWT_SECRET must be set")),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::parse();
    let jwt_secret = resolve_jwt_secret(config.jwt_secret)?;

    let pool = match &config.database_url {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            Some(pool)
        }
        None => {
            warn!("DATABASE_URL not set; running on in-memory fixtures");
            None
        }
    };

    if config.seed {
        match &pool {
            Some(pool) => {
                seed_example_data(pool)
                    .await
                    .map_err(|err| std::io::Error::other(err.to_string()))?;
            }
            None => warn!("--seed requested without DATABASE_URL; skipping"),
        }
    }

    let mut server_config =
        ServerConfig::new(config.bind, jwt_secret).with_allowed_origins(config.allowed_origins);
    if let Some(pool) = pool {
        server_config = server_config.with_db_pool(pool);
    }

    info!(addr = %config.bind, "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, server_config)?.await
}
