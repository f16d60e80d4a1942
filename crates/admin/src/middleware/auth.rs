//! Bearer token authentication for the role callable.
//!
//! The two authorization failures are distinct codes: a missing or
//! invalid token is `unauthenticated`, a valid token whose owner lacks
//! the boolean `admin` claim is `permission-denied`.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::db::TokenRepository;
use crate::db::tokens::Caller;
use crate::error::CallableError;
use crate::state::AppState;

/// Extractor that requires an administrator bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     RequireAdmin(caller): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("admin call from {}", caller.email)
/// }
/// ```
pub struct RequireAdmin(pub Caller);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = CallableError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            CallableError::Unauthenticated(
                "You must be logged in to perform this action.".to_owned(),
            )
        })?;

        let caller = TokenRepository::new(state.pool())
            .resolve(token)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve bearer token: {}", e);
                CallableError::Internal("Failed to set custom user role.".to_owned())
            })?
            .ok_or_else(|| {
                CallableError::Unauthenticated(
                    "You must be logged in to perform this action.".to_owned(),
                )
            })?;

        // The admin claim must be the boolean true; truthy strings don't count
        if !caller.claims.is_admin() {
            return Err(CallableError::PermissionDenied(
                "Only administrators can set user roles.".to_owned(),
            ));
        }

        Ok(Self(caller))
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use secrecy::SecretString;
    use sqlx::PgPool;
    use std::net::{IpAddr, Ipv4Addr};

    use crate::config::AdminConfig;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/roles/assign");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).map(Request::into_parts).unwrap_or_else(|_| {
            unreachable!("static request is valid");
        });
        parts
    }

    #[test]
    fn test_bearer_token_extracts_value() {
        let parts = parts_with_auth(Some("Bearer qv_abc123"));
        assert_eq!(bearer_token(&parts), Some("qv_abc123"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_rejects_empty_and_missing() {
        assert_eq!(bearer_token(&parts_with_auth(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with_auth(None)), None);
    }

    /// A lazy pool never connects, so the state works for paths that must
    /// fail before any database access.
    fn lazy_state() -> AppState {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        AppState::new(config, pool)
    }

    #[tokio::test]
    async fn test_missing_token_rejected_before_any_lookup() {
        let state = lazy_state();
        let mut parts = parts_with_auth(None);

        let err = RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert_eq!(err.code(), "unauthenticated");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_rejected_before_any_lookup() {
        let state = lazy_state();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));

        let err = RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert_eq!(err.code(), "unauthenticated");
    }
}
