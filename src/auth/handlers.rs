//! Login and logout endpoints

use super::{SessionStore, token_from_headers};
use crate::core::error::{RecordError, Result};
use axum::body::Bytes;
use axum::extract::{FromRef, State};
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{Value, json};

/// Routes for `/login/` and `/logout/`
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    SessionStore: FromRef<S>,
{
    Router::new()
        .route("/login/", post(login))
        .route("/logout/", post(logout))
}

/// Exchange `{"username", "password"}` for `{"key": token}`
///
/// Any body that does not carry both credentials as strings is treated as
/// invalid credentials.
pub async fn login(State(sessions): State<SessionStore>, body: Bytes) -> Result<Json<Value>> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let (Some(username), Some(password)) = (
        payload.get("username").and_then(Value::as_str),
        payload.get("password").and_then(Value::as_str),
    ) else {
        return Err(RecordError::InvalidCredentials);
    };

    // Argon2 verification is CPU-bound
    let (username, password) = (username.to_string(), password.to_string());
    let key = tokio::task::spawn_blocking(move || sessions.login(&username, &password))
        .await
        .map_err(|e| RecordError::Internal(format!("login task failed: {e}")))??;

    Ok(Json(json!({ "key": key })))
}

/// Revoke the presented token, if any; always succeeds
pub async fn logout(State(sessions): State<SessionStore>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = token_from_headers(&headers) {
        if let Err(e) = sessions.logout(token) {
            tracing::warn!(error = %e, "failed to revoke session");
        }
    }

    Json(json!({ "detail": "Successfully logged out." }))
}
