//! Typed error handling for the record service
//!
//! Every failure is scoped to the single request that caused it. The HTTP
//! mapping is:
//!
//! - [`RecordError::NotFound`]: 404, empty body
//! - [`RecordError::Validation`]: 400, field to messages map
//! - [`RecordError::MalformedBody`]: 400, `{"detail": ...}`
//! - [`RecordError::Unauthenticated`]: 403, empty body
//! - [`RecordError::InvalidCredentials`]: 400, `{"non_field_errors": [...]}`
//! - [`RecordError::Storage`] / [`RecordError::Internal`]: 500

use crate::core::validation::{FieldErrors, NON_FIELD_ERRORS};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Message returned when login credentials do not match a user
pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

pub type Result<T, E = RecordError> = std::result::Result<T, E>;

/// The main error type of the crate
#[derive(Debug)]
pub enum RecordError {
    /// Id does not resolve to an active record
    NotFound { entity_type: &'static str, id: String },

    /// Missing or malformed fields, or an invalid reference
    Validation(FieldErrors),

    /// Request body is not parseable JSON
    MalformedBody(String),

    /// No valid session token on the request
    Unauthenticated,

    /// Login attempt with wrong username or password
    InvalidCredentials,

    /// Storage backend failure
    Storage(String),

    /// Internal failure (should not happen in normal operation)
    Internal(String),
}

impl RecordError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        RecordError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecordError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecordError::Validation(_) => StatusCode::BAD_REQUEST,
            RecordError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RecordError::Unauthenticated => StatusCode::FORBIDDEN,
            RecordError::InvalidCredentials => StatusCode::BAD_REQUEST,
            RecordError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RecordError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            RecordError::NotFound { .. } => "NOT_FOUND",
            RecordError::Validation(_) => "VALIDATION_ERROR",
            RecordError::MalformedBody(_) => "MALFORMED_BODY",
            RecordError::Unauthenticated => "UNAUTHENTICATED",
            RecordError::InvalidCredentials => "INVALID_CREDENTIALS",
            RecordError::Storage(_) => "STORAGE_ERROR",
            RecordError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            RecordError::Validation(errors) => write!(f, "{}", errors),
            RecordError::MalformedBody(msg) => write!(f, "JSON parse error - {}", msg),
            RecordError::Unauthenticated => {
                write!(f, "Authentication credentials were not provided")
            }
            RecordError::InvalidCredentials => write!(f, "{}", INVALID_CREDENTIALS),
            RecordError::Storage(msg) => write!(f, "Storage error: {}", msg),
            RecordError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for RecordError {
    fn from(errors: FieldErrors) -> Self {
        RecordError::Validation(errors)
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::Internal(format!("serialization failed: {}", err))
    }
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            RecordError::NotFound { .. } | RecordError::Unauthenticated => status.into_response(),
            RecordError::Validation(errors) => (status, Json(errors)).into_response(),
            RecordError::InvalidCredentials => (
                status,
                Json(json!({ NON_FIELD_ERRORS: [INVALID_CREDENTIALS] })),
            )
                .into_response(),
            RecordError::MalformedBody(_) => {
                (status, Json(json!({ "detail": self.to_string() }))).into_response()
            }
            RecordError::Storage(_) | RecordError::Internal(_) => {
                tracing::error!(code = self.error_code(), error = %self, "request failed");
                (status, Json(json!({ "detail": self.to_string() }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: RecordError) -> (StatusCode, Vec<u8>) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_not_found_is_404_with_empty_body() {
        let (status, body) = body_of(RecordError::not_found("auto", 99)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_is_403_with_empty_body() {
        let (status, body) = body_of(RecordError::Unauthenticated).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_validation_renders_field_map() {
        let errors = FieldErrors::single("driver", "This field is required.");
        let (status, body) = body_of(RecordError::from(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({"driver": ["This field is required."]}));
    }

    #[tokio::test]
    async fn test_invalid_credentials_renders_non_field_errors() {
        let (status, body) = body_of(RecordError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[NON_FIELD_ERRORS][0], INVALID_CREDENTIALS);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RecordError::Unauthenticated.error_code(), "UNAUTHENTICATED");
        assert_eq!(
            RecordError::Storage("lock poisoned".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RecordError::not_found("partner", 3).to_string(),
            "partner with id '3' not found"
        );
    }
}
