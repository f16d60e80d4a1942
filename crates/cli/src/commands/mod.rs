//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod token;

use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: set WEB_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No user with the given email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),

    /// Stored claims could not be interpreted.
    #[error("Corrupt claims for user {0}: {1}")]
    CorruptClaims(String, String),
}

/// Connect to the site database named by the environment.
///
/// `WEB_DATABASE_URL` wins over `DATABASE_URL`, matching the web binary.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("WEB_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(&database_url).await?)
}
