//! API error taxonomy
//!
//! Maps internal failures onto the HTTP contract: missing credentials are
//! the caller's problem (401), malformed bodies are 400, remote failures
//! pass the management API's status and body through, and anything
//! unexpected is a 500 with the error's textual detail. Per-item batch
//! failures never surface here; they live inside batch outcomes.

use crate::arm::{ArmError, AuthError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid Authorization header")]
    MissingCredential,

    #[error("{0}")]
    MalformedBody(String),

    #[error("Service is running in read-only mode")]
    ReadOnly,

    #[error("Error calling the management API")]
    Remote { status: u16, details: Value },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::MissingCredential
    }
}

impl From<ArmError> for ApiError {
    fn from(err: ArmError) -> Self {
        match err {
            ArmError::Remote { status, body } => ApiError::Remote {
                status,
                details: body,
            },
            other => ApiError::Internal(other.into()),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential => StatusCode::UNAUTHORIZED,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::ReadOnly => StatusCode::FORBIDDEN,
            ApiError::Remote { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::Remote { details, .. } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            ApiError::Internal(err) => {
                tracing::error!("unexpected error: {err:#}");
                json!({
                    "error": "Internal server error",
                    "details": format!("{err:#}"),
                })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::MissingCredential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::MalformedBody("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::ReadOnly.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn remote_status_passes_through() {
        let err = ApiError::Remote {
            status: 403,
            details: json!({"error": {"code": "AuthorizationFailed"}}),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn bogus_remote_status_becomes_500() {
        let err = ApiError::Remote {
            status: 42,
            details: Value::Null,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn arm_remote_errors_convert_losslessly() {
        let arm = ArmError::Remote {
            status: 429,
            body: json!({"error": {"message": "throttled"}}),
        };
        match ApiError::from(arm) {
            ApiError::Remote { status, details } => {
                assert_eq!(status, 429);
                assert_eq!(details["error"]["message"], "throttled");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
