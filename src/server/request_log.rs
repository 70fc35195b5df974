//! Request logging middleware
//!
//! Emits one `info` event per request with the endpoint, the method and the
//! raw request body. Bodies of known size up to [`BODY_LIMIT`] are buffered
//! and handed on unchanged; anything else is forwarded untouched and logged
//! as omitted. Logging never alters the response.

use axum::body::{Body, HttpBody, to_bytes};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

/// Largest body buffered for logging; matches axum's default body limit
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Keys whose values never reach the log
const SECRET_KEYS: &[&str] = &["password"];

const REDACTED: &str = "********";

pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let endpoint = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let bufferable = body
        .size_hint()
        .upper()
        .is_some_and(|len| len <= BODY_LIMIT as u64);

    let (body, logged) = if bufferable {
        match to_bytes(body, BODY_LIMIT).await {
            Ok(bytes) => {
                let logged = loggable_body(&bytes);
                (Body::from(bytes), logged)
            }
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "request body unreadable");
                (Body::empty(), String::new())
            }
        }
    } else {
        let size = body.size_hint().lower();
        (body, format!("<body omitted, at least {} bytes>", size))
    };

    tracing::info!(
        endpoint = %endpoint,
        method = %parts.method,
        request = %logged,
        "request"
    );

    let response = next.run(Request::from_parts(parts, body)).await;

    tracing::debug!(endpoint = %endpoint, status = response.status().as_u16(), "response");
    response
}

/// Render a body for the log with secret fields masked
fn loggable_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(mut object))
            if SECRET_KEYS.iter().any(|key| object.contains_key(*key)) =>
        {
            for key in SECRET_KEYS {
                if let Some(value) = object.get_mut(*key) {
                    *value = Value::String(REDACTED.to_string());
                }
            }
            Value::Object(object).to_string()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_masked() {
        let logged = loggable_body(br#"{"username":"admin","password":"hunter2"}"#);

        assert!(!logged.contains("hunter2"));
        assert!(logged.contains("\"username\":\"admin\""));
        assert!(logged.contains(REDACTED));
    }

    #[test]
    fn test_other_bodies_are_logged_verbatim() {
        let raw = br#"{"driver": "Bela"}"#;
        assert_eq!(loggable_body(raw), "{\"driver\": \"Bela\"}");
        assert_eq!(loggable_body(b"not json"), "not json");
        assert_eq!(loggable_body(b""), "");
    }
}
