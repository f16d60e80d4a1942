//! Bearer token issuance for the role service.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token that expires in 30 days
//! qv-cli token issue -e keeper@example.com --ttl-days 30
//!
//! # Issue a token with no expiry
//! qv-cli token issue -e keeper@example.com
//! ```
//!
//! Only the SHA-256 hash of a token is stored. The plaintext is printed
//! once here and cannot be recovered afterwards.

use rand::Rng;
use uuid::Uuid;

use questvault_admin::db::tokens::hash_token;
use questvault_core::Email;

use super::{CommandError, connect};

/// Length of the random part of an issued token.
const TOKEN_LENGTH: usize = 40;

/// Issue a new bearer token for a user and print it once.
///
/// # Errors
///
/// Returns `CommandError` if the email is invalid, no user has it, or
/// the database operation fails.
pub async fn issue(email: &str, ttl_days: Option<i32>) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    let pool = connect().await?;

    let user_id: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM app_user WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    let Some((user_id,)) = user_id else {
        return Err(CommandError::UserNotFound(email.into_inner()));
    };

    let token = format!("qv_{}", generate_token(TOKEN_LENGTH));

    sqlx::query(
        "INSERT INTO api_token (user_id, token_hash, expires_at)
         VALUES ($1, $2, NOW() + make_interval(days => $3))",
    )
    .bind(user_id)
    .bind(hash_token(&token))
    .bind(ttl_days)
    .execute(&pool)
    .await?;

    tracing::info!("Token issued for {}", email.as_str());
    match ttl_days {
        Some(days) => tracing::info!("Expires in {} days", days),
        None => tracing::info!("No expiry"),
    }
    tracing::info!("");
    tracing::info!("This token is shown once. Store it now:");
    tracing::info!("  {}", token);

    Ok(())
}

/// Generate a random alphanumeric token body.
fn generate_token(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_length_and_charset() {
        let token = generate_token(TOKEN_LENGTH);
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_token_is_not_constant() {
        assert_ne!(generate_token(32), generate_token(32));
    }
}
