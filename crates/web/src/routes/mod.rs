//! HTTP route handlers for the character sheet site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Character list (requires sign-in)
//! GET  /health                   - Health check
//!
//! # Characters (require sign-in)
//! GET  /characters/new           - Editor for a new character
//! POST /characters               - Create character
//! GET  /characters/{id}/edit     - Editor for an existing character
//! POST /characters/{id}          - Update character
//! POST /characters/{id}/delete   - Delete character
//!
//! # Auth
//! GET  /auth/login               - Login page
//! POST /auth/login               - Login action
//! GET  /auth/register            - Register page
//! POST /auth/register            - Register action
//! POST /auth/logout              - Logout action
//!
//! # Google OAuth
//! GET  /auth/google/login        - Redirect to Google consent page
//! GET  /auth/google/callback     - Handle OAuth callback
//! ```

pub mod auth;
pub mod characters;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        // Google OpenID Connect
        .route("/google/login", get(auth::google_login))
        .route("/google/callback", get(auth::google_callback))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Character list at the root
        .route("/", get(characters::list::index))
        // Character editor routes
        .nest("/characters", characters::routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
