//! Token authentication
//!
//! Clients obtain a token from `POST /login/` and send it back as
//! `Authorization: Token <key>` (or `Bearer <key>`). Entity handlers take a
//! [`CurrentUser`] argument, which rejects the request with 403 before the
//! handler body, and therefore the store, is reached.

pub mod handlers;
pub mod password;
pub mod session;

pub use handlers::{login, logout, routes};
pub use session::SessionStore;

use crate::core::error::RecordError;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, request::Parts};

/// Accepted `Authorization` schemes
const SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub token: String,
}

/// Pull the session token out of the `Authorization` header
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (SCHEMES.contains(&scheme) && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionStore: FromRef<S>,
{
    type Rejection = RecordError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or_else(|| {
            tracing::trace!(path = %parts.uri.path(), "no session token");
            RecordError::Unauthenticated
        })?;

        SessionStore::from_ref(state).authenticate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_token_schemes() {
        assert_eq!(token_from_headers(&headers("Token abc")), Some("abc"));
        assert_eq!(token_from_headers(&headers("Bearer abc")), Some("abc"));
        assert_eq!(token_from_headers(&headers("Basic abc")), None);
        assert_eq!(token_from_headers(&headers("Token")), None);
        assert_eq!(token_from_headers(&headers("Token   ")), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
