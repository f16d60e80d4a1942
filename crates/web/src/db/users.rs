//! User repository for database operations.
//!
//! Accounts created by either credential strategy live in the same table;
//! the strategy only determines which of `password_hash` and `google_sub`
//! is populated.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use questvault_core::{ClaimSet, Email, UserId};

use super::RepositoryError;
use crate::models::User;

/// Columns selected for every user read.
const USER_COLUMNS: &str = "id, email, display_name, photo_url, claims, created_at, updated_at";

/// Raw user row as stored.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    display_name: Option<String>,
    photo_url: Option<String>,
    claims: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert the raw row into the domain model.
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let claims = ClaimSet::try_from(self.claims).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid claims in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            email,
            display_name: self.display_name,
            photo_url: self.photo_url,
            claims,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with email and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO app_user (email, password_hash)
             VALUES ($1, $2)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set
    /// (e.g. a Google-only account).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: Option<String>,
        }

        let row: Option<UserWithPassword> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM app_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Some(password_hash) = row.password_hash else {
            return Ok(None);
        };

        Ok(Some((row.user.into_user()?, password_hash)))
    }

    /// Find or create the account for a Google identity.
    ///
    /// Matches by Google subject first, then by email (linking the Google
    /// identity to an existing password account), and inserts a fresh
    /// account when neither matches. Profile fields are refreshed from the
    /// Google profile on every sign-in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn upsert_google(
        &self,
        google_sub: &str,
        email: &Email,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE app_user
             SET email = $2, display_name = COALESCE($3, display_name),
                 photo_url = COALESCE($4, photo_url), updated_at = NOW()
             WHERE google_sub = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(google_sub)
        .bind(email.as_str())
        .bind(display_name)
        .bind(photo_url)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = existing {
            tx.commit().await?;
            return row.into_user();
        }

        let linked: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE app_user
             SET google_sub = $1, display_name = COALESCE($3, display_name),
                 photo_url = COALESCE($4, photo_url), updated_at = NOW()
             WHERE email = $2
             RETURNING {USER_COLUMNS}"
        ))
        .bind(google_sub)
        .bind(email.as_str())
        .bind(display_name)
        .bind(photo_url)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = linked {
            tx.commit().await?;
            return row.into_user();
        }

        let created: UserRow = sqlx::query_as(&format!(
            "INSERT INTO app_user (email, google_sub, display_name, photo_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(google_sub)
        .bind(display_name)
        .bind(photo_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        created.into_user()
    }
}
