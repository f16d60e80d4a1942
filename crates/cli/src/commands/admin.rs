//! Admin claim management commands.
//!
//! # Usage
//!
//! ```bash
//! # Grant the admin claim
//! qv-cli admin grant -e keeper@example.com
//!
//! # Revoke the admin claim
//! qv-cli admin revoke -e keeper@example.com
//! ```
//!
//! The role service only honors callers whose `admin` claim is the
//! boolean `true`, so this is the bootstrap path for the first
//! administrator.

use uuid::Uuid;

use questvault_core::{ClaimSet, Email};

use super::{CommandError, connect};

/// Set or clear the boolean admin claim on a user account.
///
/// Every other claim entry (including `role`) is preserved.
///
/// # Errors
///
/// Returns `CommandError` if the email is invalid, no user has it, or
/// the database operation fails.
pub async fn set_admin(email: &str, admin: bool) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    let pool = connect().await?;

    let row: Option<(Uuid, serde_json::Value)> =
        sqlx::query_as("SELECT id, claims FROM app_user WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&pool)
            .await?;

    let Some((user_id, claims)) = row else {
        return Err(CommandError::UserNotFound(email.into_inner()));
    };

    let mut claims = ClaimSet::try_from(claims)
        .map_err(|e| CommandError::CorruptClaims(email.as_str().to_owned(), e.to_string()))?;
    claims.set_admin(admin);

    sqlx::query("UPDATE app_user SET claims = $1, updated_at = NOW() WHERE id = $2")
        .bind(serde_json::Value::from(claims))
        .bind(user_id)
        .execute(&pool)
        .await?;

    if admin {
        tracing::info!("Granted admin claim to {}", email.as_str());
        tracing::info!("The claim takes effect on the user's next sign-in.");
    } else {
        tracing::info!("Revoked admin claim from {}", email.as_str());
    }

    Ok(())
}
