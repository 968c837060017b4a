//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at build
//! time.

use accounts_api::db;

use super::{CommandError, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to accounts database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running accounts migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Accounts migrations complete!");
    Ok(())
}
