//! Callable error taxonomy.
//!
//! Every failure maps to one of five stable codes carried in a JSON body,
//! so callers can branch on the code rather than parse messages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the role callable.
#[derive(Debug, Error)]
pub enum CallableError {
    /// No valid bearer token on the request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller is authenticated but not an administrator.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Request payload is missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Target user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Anything else (database failures, corrupted rows).
    #[error("internal: {0}")]
    Internal(String),
}

impl CallableError {
    /// The stable wire code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthenticated",
            Self::PermissionDenied(_) => "permission-denied",
            Self::InvalidArgument(_) => "invalid-argument",
            Self::NotFound(_) => "not-found",
            Self::Internal(_) => "internal",
        }
    }

    /// The message carried to the caller.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthenticated(msg)
            | Self::PermissionDenied(msg)
            | Self::InvalidArgument(msg)
            | Self::NotFound(msg)
            | Self::Internal(msg) => msg,
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CallableError {
    fn into_response(self) -> Response {
        // Only internal failures are ours to investigate
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Callable error"
            );
        }

        let body = json!({
            "error": {
                "status": self.code(),
                "message": self.message(),
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `CallableError`.
pub type Result<T> = std::result::Result<T, CallableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CallableError::Unauthenticated(String::new()).code(),
            "unauthenticated"
        );
        assert_eq!(
            CallableError::PermissionDenied(String::new()).code(),
            "permission-denied"
        );
        assert_eq!(
            CallableError::InvalidArgument(String::new()).code(),
            "invalid-argument"
        );
        assert_eq!(CallableError::NotFound(String::new()).code(), "not-found");
        assert_eq!(CallableError::Internal(String::new()).code(), "internal");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CallableError::Unauthenticated(String::new())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CallableError::PermissionDenied(String::new())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CallableError::InvalidArgument(String::new())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CallableError::NotFound(String::new())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }
}
