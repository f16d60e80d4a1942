//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! qv-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `WEB_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migration files live in `crates/web/migrations/`. The web and admin
//! binaries share one database, so there is a single migration set.

use super::{CommandError, connect};

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
