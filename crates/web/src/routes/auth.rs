//! Authentication route handlers.
//!
//! Handles sign-in, registration, Google OAuth, and sign-out. Which forms
//! and buttons appear is driven by the configured provider list; both
//! strategies end in the same session state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, HeaderView, session_keys};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login and register pages.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub header: HeaderView,
    pub error: Option<String>,
    pub next: Option<String>,
    pub show_password: bool,
    pub show_google: bool,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub header: HeaderView,
    pub error: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
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

/// Only allow same-site destinations for post-login redirects.
fn sanitize_next(next: Option<String>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/".to_owned(),
    }
}

/// Store the signed-in user in the session and tag Sentry events.
async fn establish_session(session: &Session, user: &crate::models::User) -> Result<(), Response> {
    let current = CurrentUser::from(user);
    if let Err(e) = set_current_user(session, &current).await {
        tracing::error!("Failed to set session: {}", e);
        return Err(Redirect::to("/auth/login?error=session").into_response());
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// # Route
///
/// `GET /auth/login`
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let providers = state.config().providers;

    LoginTemplate {
        header: HeaderView::SignedOut,
        error: query.error,
        next: query.next,
        show_password: providers.password,
        show_google: providers.google,
    }
}

/// Handle login form submission.
///
/// # Route
///
/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool(), state.config().providers);

    match auth.login_with_password(&form.email, &form.password).await {
        Ok(user) => {
            if let Err(response) = establish_session(&session, &user).await {
                return response;
            }

            tracing::info!(user_id = %user.id, "User signed in with password");
            Redirect::to(&sanitize_next(form.next)).into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
///
/// # Route
///
/// `GET /auth/register`
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        header: HeaderView::SignedOut,
        error: query.error,
    }
}

/// Handle registration form submission.
///
/// Signs the user in immediately on success.
///
/// # Route
///
/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    let auth = AuthService::new(state.pool(), state.config().providers);

    match auth
        .register_with_password(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            if let Err(response) = establish_session(&session, &user).await {
                return response;
            }

            tracing::info!(user_id = %user.id, "User registered");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            match e {
                AuthError::UserAlreadyExists => {
                    Redirect::to("/auth/register?error=email_taken").into_response()
                }
                AuthError::WeakPassword(_) => {
                    Redirect::to("/auth/register?error=password_too_short").into_response()
                }
                _ => Redirect::to("/auth/register?error=failed").into_response(),
            }
        }
    }
}

// =============================================================================
// Google OAuth Routes
// =============================================================================

/// Initiate Google sign-in.
///
/// Generates state and nonce parameters, stores them in the session,
/// and redirects to Google's consent page.
///
/// # Route
///
/// `GET /auth/google/login`
pub async fn google_login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Response {
    let Some(google) = state.google() else {
        return Redirect::to("/auth/login?error=google_disabled").into_response();
    };

    // Generate CSRF state and OpenID nonce
    let oauth_state = generate_random_string(32);
    let nonce = generate_random_string(32);

    // Store in session for validation on callback
    if let Err(e) = session
        .insert(session_keys::GOOGLE_OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    if let Err(e) = session
        .insert(session_keys::GOOGLE_OAUTH_NONCE, &nonce)
        .await
    {
        tracing::error!("Failed to store OAuth nonce in session: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    // Remember where to send the user after the callback
    let next = sanitize_next(query.next);
    if let Err(e) = session.insert(session_keys::LOGIN_REDIRECT, &next).await {
        tracing::error!("Failed to store login redirect in session: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    // Build the redirect URI
    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);

    // Generate and redirect to authorization URL
    let auth_url = google.authorization_url(&redirect_uri, &oauth_state, &nonce);

    Redirect::to(&auth_url).into_response()
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code for the
/// identity, checks the nonce, and signs the user in.
///
/// # Route
///
/// `GET /auth/google/callback`
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(google) = state.google() else {
        return Redirect::to("/auth/login?error=google_disabled").into_response();
    };

    // Check for OAuth errors from Google
    if let Some(error) = query.error {
        tracing::warn!("Google OAuth error: {}", error);
        return Redirect::to("/auth/login?error=google_denied").into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return Redirect::to("/auth/login?error=missing_code").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return Redirect::to("/auth/login?error=missing_state").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::GOOGLE_OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Google OAuth state mismatch");
        return Redirect::to("/auth/login?error=invalid_state").into_response();
    }

    let stored_nonce: Option<String> = session
        .get(session_keys::GOOGLE_OAUTH_NONCE)
        .await
        .ok()
        .flatten();

    // Clear the stored state (one-time use)
    let _ = session
        .remove::<String>(session_keys::GOOGLE_OAUTH_STATE)
        .await;
    let _ = session
        .remove::<String>(session_keys::GOOGLE_OAUTH_NONCE)
        .await;

    // Build redirect URI (must match the one used in authorization request)
    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);

    // Exchange code for the asserted identity
    let identity = match google.exchange_code(&code, &redirect_uri).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!("Failed to exchange Google OAuth code: {}", e);
            return Redirect::to("/auth/login?error=token_exchange").into_response();
        }
    };

    // Verify nonce (ID token replay protection)
    if identity.nonce != stored_nonce {
        tracing::warn!("Google OAuth nonce mismatch");
        return Redirect::to("/auth/login?error=invalid_state").into_response();
    }

    // Find or create the account
    let auth = AuthService::new(state.pool(), state.config().providers);
    let user = match auth.login_with_google(&identity).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Google sign-in failed: {}", e);
            return Redirect::to("/auth/login?error=google_failed").into_response();
        }
    };

    if let Err(response) = establish_session(&session, &user).await {
        return response;
    }

    tracing::info!(user_id = %user.id, "User signed in with Google");

    // Send the user back to where they started
    let next: String = session
        .remove(session_keys::LOGIN_REDIRECT)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| "/".to_owned());

    Redirect::to(&next).into_response()
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle sign-out.
///
/// Clears the session entirely; the next request renders the signed-out
/// header and the gate redirects protected views to the login page. If the
/// session cannot be cleared the visitor stays signed in and returns to
/// the list, session intact.
///
/// # Route
///
/// `POST /auth/logout`
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
        return Redirect::to("/").into_response();
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        // The user key is already gone, so the visitor is signed out
        tracing::error!("Failed to flush session: {}", e);
    }

    clear_sentry_user();

    Redirect::to("/auth/login").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_template_has_no_registration_banner() {
        // Registration signs the user in directly; the login page only
        // ever carries error text.
        let template = LoginTemplate {
            header: HeaderView::SignedOut,
            error: Some("credentials".to_owned()),
            next: None,
            show_password: true,
            show_google: false,
        };

        let html = template.render().unwrap();
        assert!(html.contains("Invalid email or password."));
        assert!(!html.contains("Account created"));
    }

    #[test]
    fn test_generate_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_sanitize_next_allows_local_paths() {
        assert_eq!(
            sanitize_next(Some("/characters/new".to_owned())),
            "/characters/new"
        );
    }

    #[test]
    fn test_sanitize_next_rejects_external_targets() {
        assert_eq!(sanitize_next(Some("https://evil.example".to_owned())), "/");
        assert_eq!(sanitize_next(Some("//evil.example".to_owned())), "/");
        assert_eq!(sanitize_next(None), "/");
    }
}
