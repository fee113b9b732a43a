//! Embedded schema migrations applied at startup.
//!
//! `diesel_migrations` only drives synchronous connections, so the run happens
//! on the blocking pool with a short-lived `PgConnection`.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task did not complete: {message}")]
    Join { message: String },
}

/// Apply every pending migration and return how many ran.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a migration
/// fails; callers treat either as fatal.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url).map_err(|err| MigrationError::Connect {
            message: err.to_string(),
        })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })
    })
    .await
    .map_err(|err| MigrationError::Join {
        message: err.to_string(),
    })??;

    info!(applied, "database migrations up to date");
    Ok(applied)
}
