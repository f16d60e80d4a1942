//! User account model.

use chrono::{DateTime, Utc};

use questvault_core::{ClaimSet, Email, UserId};

/// A registered user account.
///
/// An account is created by either credential strategy. Password accounts
/// have a `password_hash`; Google accounts have a `google_sub`. An account
/// that signed up with a password and later signed in with Google has both.
#[derive(Debug, Clone)]
pub struct User {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name, taken from the Google profile when available.
    pub display_name: Option<String>,
    /// Profile photo URL, taken from the Google profile when available.
    pub photo_url: Option<String>,
    /// Custom claims (role, admin flag).
    pub claims: ClaimSet,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
