//! Database migration command.
//!
//! Applies `crates/api/migrations/` and creates the tower-sessions table
//! the API stores pre-bill sessions in.
//!
//! # Environment Variables
//!
//! - `KIRANA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use super::{CommandError, database_url};

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = kirana_api::db::create_pool(&database_url).await?;

    info!("Running catalog migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    info!("Migrations complete!");
    Ok(())
}
