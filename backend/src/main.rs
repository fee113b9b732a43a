//! Backend entry-point: reads settings, migrates the database and serves the API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, BuildMode, ServerConfig, create_server};
use todo_backend::inbound::http::health::HealthState;
use todo_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

fn startup_error(stage: &'static str, err: impl std::fmt::Display) -> std::io::Error {
    error!(stage, error = %err, "startup failed");
    std::io::Error::other(format!("{stage}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let settings = AppSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("configuration", err))?;
    let database_url = settings.database.connection_string();

    run_pending_migrations(&database_url)
        .await
        .map_err(|err| startup_error("migrations", err))?;

    let pool = DbPool::new(PoolConfig::new(database_url.as_str()))
        .await
        .map_err(|err| startup_error("database pool", err))?;

    let config = ServerConfig::new(&settings).with_db_pool(pool);
    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
