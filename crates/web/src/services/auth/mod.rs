//! Authentication service.
//!
//! Two interchangeable credential strategies sit behind this service:
//! email/password and Google `OpenID` Connect. Which strategies are active
//! is decided at configuration time; both produce the same signed-in state.

mod error;
pub mod google;

pub use error::AuthError;
pub use google::{GoogleClient, GoogleIdentity};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use questvault_core::Email;

use crate::config::AuthProviders;
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles registration and sign-in for both credential strategies.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    providers: AuthProviders,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, providers: AuthProviders) -> Self {
        Self {
            users: UserRepository::new(pool),
            providers,
        }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderDisabled` if password sign-in is not enabled.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if !self.providers.password {
            return Err(AuthError::ProviderDisabled("password"));
        }

        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create_with_password(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderDisabled` if password sign-in is not enabled.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if !self.providers.password {
            return Err(AuthError::ProviderDisabled("password"));
        }

        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    // =========================================================================
    // Google Authentication
    // =========================================================================

    /// Sign in with a verified Google identity.
    ///
    /// Called after the OAuth callback has validated state and nonce.
    /// Creates the account on first sign-in and refreshes the profile
    /// fields on every subsequent one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderDisabled` if Google sign-in is not enabled.
    /// Returns `AuthError::InvalidEmail` if Google asserted an invalid email.
    pub async fn login_with_google(&self, identity: &GoogleIdentity) -> Result<User, AuthError> {
        if !self.providers.google {
            return Err(AuthError::ProviderDisabled("google"));
        }

        let email = Email::parse(&identity.email)?;

        let user = self
            .users
            .upsert_google(
                &identity.sub,
                &email,
                identity.name.as_deref(),
                identity.picture.as_deref(),
            )
            .await?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }
}
