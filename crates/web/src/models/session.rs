//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use questvault_core::{Email, UserId};

use crate::models::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
/// Captured at sign-in; a claims change takes effect on the next sign-in,
/// not mid-session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name, if the account has one.
    pub display_name: Option<String>,
    /// Profile photo URL, if the account has one.
    pub photo_url: Option<String>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for Google OAuth state (CSRF protection).
    pub const GOOGLE_OAUTH_STATE: &str = "google_oauth_state";

    /// Key for Google OAuth nonce (`OpenID` Connect replay protection).
    pub const GOOGLE_OAUTH_NONCE: &str = "google_oauth_nonce";

    /// Key for the post-login destination path.
    pub const LOGIN_REDIRECT: &str = "login_redirect";
}
