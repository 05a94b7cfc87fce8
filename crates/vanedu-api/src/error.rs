//! HTTP error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors a handler can answer with
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or invalid request input
    #[error("{message}")]
    BadRequest {
        /// Client-facing message naming the failed operation
        message: String,
        /// What was wrong with the input
        details: Option<String>,
    },

    /// No record with the requested id
    #[error("{resource} not found")]
    NotFound {
        /// Record kind ("User", "Payment")
        resource: String,
    },

    /// Credentials were rejected
    #[error("{0}")]
    Unauthorized(String),

    /// Anything else; the detail is logged, never returned
    #[error("Internal server error")]
    Internal(String),
}

/// Error body: `{message, code, details?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Extra context for invalid input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Invalid input error
    pub fn bad_request(message: impl Into<String>, details: Option<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }

    /// Relabel an invalid-input error with the operation that failed,
    /// keeping the original message as detail
    #[must_use]
    pub fn during(self, operation: &str) -> Self {
        match self {
            Self::BadRequest { message, details } => Self::BadRequest {
                message: operation.to_string(),
                details: Some(match details {
                    Some(details) => format!("{message}: {details}"),
                    None => message,
                }),
            },
            other => other,
        }
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for this error
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<vanedu_core::Error> for ApiError {
    fn from(err: vanedu_core::Error) -> Self {
        use vanedu_core::Error;

        match err {
            Error::NotFound { resource, .. } => Self::NotFound { resource },
            Error::Validation { field, message } => {
                Self::bad_request("Invalid request", Some(format!("{field}: {message}")))
            }
            Error::Authentication(message) => Self::Unauthorized(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let body = match self {
            Self::BadRequest { message, details } => ErrorResponse {
                message,
                code,
                details,
            },
            Self::Internal(detail) => {
                error!(detail = %detail, "Request failed with internal error");
                ErrorResponse {
                    message: "Internal server error".to_string(),
                    code,
                    details: None,
                }
            }
            other => ErrorResponse {
                message: other.to_string(),
                code,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    async fn body_of(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let error = ApiError::from(vanedu_core::Error::not_found("User", "999"));
        let (status, body) = body_of(error).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "User not found");
        assert_eq!(body.code, "NOT_FOUND");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_returned() {
        let (status, body) = body_of(ApiError::Internal("lock poisoned".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal server error");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_authentication_maps_to_unauthorized() {
        let error = ApiError::from(vanedu_core::Error::Authentication(
            "Invalid credentials".to_string(),
        ));
        let (status, body) = body_of(error).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message, "Invalid credentials");
        assert_eq!(body.code, "UNAUTHORIZED");
    }

    #[test]
    fn test_during_relabels_bad_request() {
        let error = ApiError::bad_request("Invalid request body", Some("missing field `email`".into()))
            .during("Failed to create user");

        match error {
            ApiError::BadRequest { message, details } => {
                assert_eq!(message, "Failed to create user");
                assert_eq!(
                    details.as_deref(),
                    Some("Invalid request body: missing field `email`")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_during_keeps_other_errors() {
        let error = ApiError::NotFound {
            resource: "Payment".to_string(),
        }
        .during("Failed to update payment");

        assert_eq!(error.to_string(), "Payment not found");
        assert_eq!(error.code(), "NOT_FOUND");
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let error = ApiError::from(vanedu_core::Error::validation("status", "unknown value"));

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "VALIDATION_ERROR");
    }
}
