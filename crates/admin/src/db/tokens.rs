//! API token repository.
//!
//! Tokens are opaque random strings; only their SHA-256 hash is stored.
//! Resolving a token yields the caller identity the role callable
//! authorizes against.

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use questvault_core::{ClaimSet, Email, UserId};

use super::RepositoryError;

/// The identity behind a presented bearer token.
#[derive(Debug, Clone)]
pub struct Caller {
    /// The token owner's user ID.
    pub user_id: UserId,
    /// The token owner's email.
    pub email: Email,
    /// The token owner's claims at the time of the call.
    pub claims: ClaimSet,
}

/// Hash a token for storage or lookup.
#[must_use]
pub fn hash_token(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}

/// Repository for API token operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a presented token to its owner.
    ///
    /// Returns `None` for unknown or expired tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the owner row is invalid.
    pub async fn resolve(&self, token: &str) -> Result<Option<Caller>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CallerRow {
            id: Uuid,
            email: String,
            claims: serde_json::Value,
        }

        let row: Option<CallerRow> = sqlx::query_as(
            "SELECT u.id, u.email, u.claims
             FROM api_token t
             JOIN app_user u ON u.id = t.user_id
             WHERE t.token_hash = $1
               AND (t.expires_at IS NULL OR t.expires_at > NOW())",
        )
        .bind(hash_token(token))
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let claims = ClaimSet::try_from(row.claims).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid claims in database: {e}"))
        })?;

        Ok(Some(Caller {
            user_id: UserId::new(row.id),
            email,
            claims,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_and_distinct() {
        let a = hash_token("token-one");
        let b = hash_token("token-one");
        let c = hash_token("token-two");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 32);
    }
}
