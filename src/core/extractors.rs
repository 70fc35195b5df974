//! Axum extractors for record ids and JSON bodies
//!
//! Both reject with [`RecordError`] so that failures render like every
//! other error of the service:
//! - a path id that is not an integer cannot name a record, so it is a 404
//! - a body that is not JSON is a 400 with a `detail` message

use crate::core::entity::RecordId;
use crate::core::error::RecordError;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde_json::{Map, Value};

/// Record id taken from the `{id}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordPath(pub RecordId);

impl<S> FromRequestParts<S> for RecordPath
where
    S: Send + Sync,
{
    type Rejection = RecordError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RecordError::Internal(format!("path extraction failed: {}", e)))?;

        raw.parse::<RecordId>()
            .map(RecordPath)
            .map_err(|_| RecordError::not_found("record", raw))
    }
}

/// Parse a raw request body as JSON.
///
/// An empty body reads as an empty object so that required-field
/// validation reports what is missing.
pub fn parse_json(body: &[u8]) -> Result<Value, RecordError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| RecordError::MalformedBody(e.to_string()))
}

/// Untyped JSON body; typing and validation happen in each entity's `from_json`
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = RecordError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RecordError::MalformedBody(e.body_text()))?;

        parse_json(&bytes).map(JsonBody)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_object() {
        assert_eq!(parse_json(br#"{"partner": 1}"#).unwrap(), json!({"partner": 1}));
    }

    #[test]
    fn test_parse_empty_body_as_empty_object() {
        assert_eq!(parse_json(b"").unwrap(), json!({}));
        assert_eq!(parse_json(b"  \n").unwrap(), json!({}));
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_json(b"{not json").unwrap_err();
        assert!(matches!(err, RecordError::MalformedBody(_)));
        assert!(err.to_string().starts_with("JSON parse error - "));
    }
}
