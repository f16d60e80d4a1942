//! Role assignment routes.
//!
//! One callable endpoint. The payload is validated by hand rather than by
//! a typed extractor so that a missing or mistyped field surfaces as an
//! `invalid-argument` code instead of a framework rejection.

use axum::{Json, Router, extract::State, routing::post};
use serde_json::{Value, json};

use questvault_core::UserId;

use crate::db::UserRepository;
use crate::error::{CallableError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Create all routes for the admin service.
pub fn routes() -> Router<AppState> {
    Router::new().route("/roles/assign", post(assign_role))
}

/// Assign a role to a user.
///
/// Overwrites only the `role` entry of the target's claim set; every
/// other claim entry (including `admin`) is preserved.
///
/// # Route
///
/// `POST /roles/assign` with body `{"uid": "...", "role": "..."}`
pub async fn assign_role(
    State(state): State<AppState>,
    RequireAdmin(caller): RequireAdmin,
    Json(payload): Json<Value>,
) -> Result<Json<Value>> {
    let (uid, role) = parse_payload(&payload)?;

    // An unparsable uid cannot name an existing user
    let user_id: UserId = uid
        .parse()
        .map_err(|_| CallableError::NotFound(format!("User with UID {uid} not found.")))?;

    let users = UserRepository::new(state.pool());

    let mut claims = users
        .get_claims(user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load claims: {}", e);
            CallableError::Internal("Failed to set custom user role.".to_owned())
        })?
        .ok_or_else(|| CallableError::NotFound(format!("User with UID {uid} not found.")))?;

    claims.set_role(&role);

    users.set_claims(user_id, &claims).await.map_err(|e| {
        tracing::error!("Failed to store claims: {}", e);
        CallableError::Internal("Failed to set custom user role.".to_owned())
    })?;

    tracing::info!(
        caller = %caller.email,
        target = %user_id,
        role = %role,
        "Role assigned"
    );

    Ok(Json(json!({
        "message": format!("Successfully set role for user {uid} to {role}.")
    })))
}

/// Validate the callable payload.
///
/// Both fields are required and must be non-empty strings.
fn parse_payload(payload: &Value) -> Result<(String, String)> {
    let uid = payload
        .get("uid")
        .and_then(Value::as_str)
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| {
            CallableError::InvalidArgument(
                "The \"uid\" argument is required and must be a string.".to_owned(),
            )
        })?;

    let role = payload
        .get("role")
        .and_then(Value::as_str)
        .filter(|role| !role.is_empty())
        .ok_or_else(|| {
            CallableError::InvalidArgument(
                "The \"role\" argument is required and must be a string.".to_owned(),
            )
        })?;

    Ok((uid.to_owned(), role.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_accepts_valid_body() {
        let payload = json!({ "uid": "8f14e45f-ea14-4f52-9f62-9f9d5c6ba1a1", "role": "editor" });
        let (uid, role) = parse_payload(&payload).unwrap();
        assert_eq!(uid, "8f14e45f-ea14-4f52-9f62-9f9d5c6ba1a1");
        assert_eq!(role, "editor");
    }

    #[test]
    fn test_parse_payload_rejects_missing_uid() {
        let err = parse_payload(&json!({ "role": "editor" })).unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
        assert!(err.message().contains("uid"));
    }

    #[test]
    fn test_parse_payload_rejects_non_string_role() {
        let err = parse_payload(&json!({ "uid": "abc", "role": 7 })).unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
        assert!(err.message().contains("role"));
    }

    #[test]
    fn test_parse_payload_rejects_empty_strings() {
        let err = parse_payload(&json!({ "uid": "", "role": "editor" })).unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
    }

    #[test]
    fn test_unparsable_uid_maps_to_not_found() {
        // Mirrors the handler's uid parsing
        let uid = "definitely-not-a-uuid";
        let result: std::result::Result<UserId, _> = uid.parse();
        assert!(result.is_err());
    }
}
