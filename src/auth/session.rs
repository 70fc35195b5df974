//! In-memory user and session registry

use super::CurrentUser;
use super::password::{self, Argon2Params};
use crate::config::{AuthConfig, ConfigError};
use crate::core::error::{RecordError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Session {
    username: String,
    issued_at: Instant,
}

#[derive(Debug, Default)]
struct Registry {
    /// username -> Argon2 PHC string
    users: HashMap<String, String>,
    /// token -> session
    sessions: HashMap<String, Session>,
}

/// Users allowed to log in and the session tokens issued to them.
///
/// Cloning is cheap and clones share state.
#[derive(Clone, Default)]
pub struct SessionStore {
    registry: Arc<RwLock<Registry>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    /// Empty store; sessions expire after `ttl` when set
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            registry: Arc::default(),
            ttl,
        }
    }

    /// Build the store from configuration, hashing plaintext passwords
    pub fn from_config(config: &AuthConfig) -> std::result::Result<Self, ConfigError> {
        let store = Self::new(config.session_ttl());

        for user in &config.users {
            let result = match (&user.password, &user.password_hash) {
                (Some(plain), _) => store.add_user(&user.username, plain, config.argon2),
                (None, Some(hash)) => store.register_user(&user.username, hash),
                (None, None) => Err(RecordError::Internal("no password given".to_string())),
            };

            result.map_err(|e| ConfigError::User {
                username: user.username.clone(),
                reason: e.to_string(),
            })?;
        }

        tracing::info!(users = config.users.len(), "session store ready");
        Ok(store)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Registry>> {
        self.registry
            .read()
            .map_err(|e| RecordError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Registry>> {
        self.registry
            .write()
            .map_err(|e| RecordError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Add a user by plaintext password
    pub fn add_user(&self, username: &str, password: &str, params: Argon2Params) -> Result<()> {
        let hash = password::hash_password(password, params)?;
        self.write()?.users.insert(username.to_string(), hash);
        Ok(())
    }

    /// Add a user by precomputed Argon2 hash
    pub fn register_user(&self, username: &str, password_hash: &str) -> Result<()> {
        password::check_hash(password_hash)?;
        self.write()?
            .users
            .insert(username.to_string(), password_hash.to_string());
        Ok(())
    }

    /// Check credentials and issue a new token
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        // Clone the hash out so verification runs without holding the lock
        let hash = self.read()?.users.get(username).cloned();

        let verified = match hash {
            Some(hash) => password::verify_password(password, &hash)?,
            None => false,
        };
        if !verified {
            tracing::info!(username, "login rejected");
            return Err(RecordError::InvalidCredentials);
        }

        let token = Uuid::new_v4().simple().to_string();
        let mut registry = self.write()?;
        if let Some(ttl) = self.ttl {
            let before = registry.sessions.len();
            registry
                .sessions
                .retain(|_, session| session.issued_at.elapsed() < ttl);
            let pruned = before - registry.sessions.len();
            if pruned > 0 {
                tracing::debug!(pruned, "expired sessions pruned");
            }
        }
        registry.sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                issued_at: Instant::now(),
            },
        );
        drop(registry);

        tracing::info!(username, "login succeeded");
        Ok(token)
    }

    /// Resolve a token to its user; unknown, revoked and expired tokens fail
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser> {
        let session = self
            .read()?
            .sessions
            .get(token)
            .cloned()
            .ok_or(RecordError::Unauthenticated)?;

        if self.is_expired(&session) {
            self.write()?.sessions.remove(token);
            tracing::debug!(username = %session.username, "session expired");
            return Err(RecordError::Unauthenticated);
        }

        Ok(CurrentUser {
            username: session.username,
            token: token.to_string(),
        })
    }

    /// Revoke a token; returns whether it was live
    pub fn logout(&self, token: &str) -> Result<bool> {
        let removed = self.write()?.sessions.remove(token);
        if let Some(session) = &removed {
            tracing::info!(username = %session.username, "logged out");
        }
        Ok(removed.is_some())
    }

    /// Number of issued, unrevoked tokens (expired ones included until the next login)
    pub fn session_count(&self) -> Result<usize> {
        Ok(self.read()?.sessions.len())
    }

    fn is_expired(&self, session: &Session) -> bool {
        self.ttl
            .is_some_and(|ttl| session.issued_at.elapsed() >= ttl)
    }
}
