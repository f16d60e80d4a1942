//! User claim operations for the admin service.

use sqlx::PgPool;

use questvault_core::{ClaimSet, UserId};

use super::RepositoryError;

/// Repository for user claim operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's claim set.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored claims are invalid.
    pub async fn get_claims(&self, user_id: UserId) -> Result<Option<ClaimSet>, RepositoryError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT claims FROM app_user WHERE id = $1")
                .bind(user_id.as_uuid())
                .fetch_optional(self.pool)
                .await?;

        row.map(|(claims,)| {
            ClaimSet::try_from(claims).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid claims in database: {e}"))
            })
        })
        .transpose()
    }

    /// Replace a user's claim set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_claims(
        &self,
        user_id: UserId,
        claims: &ClaimSet,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE app_user SET claims = $1, updated_at = NOW() WHERE id = $2")
                .bind(serde_json::Value::from(claims.clone()))
                .bind(user_id.as_uuid())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
