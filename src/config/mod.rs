//! Configuration loading and management
//!
//! Configuration is read from a YAML file whose every field is optional.
//! Command-line flags (or their environment variables) override the file.
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 8000
//! log_level: info
//! auth:
//!   session_ttl_secs: 86400
//!   users:
//!     - username: admin
//!       password: admin
//!     - username: auditor
//!       password_hash: "$argon2id$v=19$m=19456,t=2,p=1$..."
//! ```

use crate::auth::password::Argon2Params;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error as ThisError;

/// Errors raised while loading or validating configuration
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid user '{username}': {reason}")]
    User { username: String, reason: String },
}

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "roadrecord", version, about = "Vehicle and partner record service")]
pub struct Args {
    /// Path to configuration file; a missing file means built-in defaults
    #[arg(short = 'f', long, env = "ROADRECORD_CONFIG", default_value = "roadrecord.yaml")]
    pub config: String,

    /// Override the bind host
    #[arg(long, env = "ROADRECORD_HOST")]
    pub host: Option<String>,

    /// Override the bind port
    #[arg(long, env = "ROADRECORD_PORT")]
    pub port: Option<u16>,

    /// Validate configuration and exit without starting the server
    #[arg(long)]
    pub validate: bool,
}

/// A user allowed to log in
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub username: String,

    /// Plaintext password, hashed at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Precomputed Argon2 PHC string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Authentication settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub users: Vec<UserConfig>,

    /// Session lifetime; sessions never expire when unset
    pub session_ttl_secs: Option<u64>,

    /// Hashing parameters for plaintext passwords
    pub argon2: Argon2Params,
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server host to bind to
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Default log filter, used when RUST_LOG is not set
    pub log_level: String,
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration for the given arguments.
    ///
    /// A missing file yields the defaults; flags override file values.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = if Path::new(&args.config).exists() {
            Self::from_yaml_file(&args.config)?
        } else {
            tracing::debug!(path = %args.config, "config file not found, using defaults");
            Self::default()
        };

        if let Some(host) = &args.host {
            config.host = host.clone();
        }
        if let Some(port) = args.port {
            config.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }

        if self.auth.session_ttl_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "auth.session_ttl_secs must be greater than zero".to_string(),
            ));
        }

        self.auth
            .argon2
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("auth.argon2: {}", e)))?;

        let mut seen = HashSet::new();
        for user in &self.auth.users {
            let invalid = |reason: &str| ConfigError::User {
                username: user.username.clone(),
                reason: reason.to_string(),
            };

            if user.username.trim().is_empty() {
                return Err(invalid("username must not be empty"));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(invalid("declared more than once"));
            }
            match (&user.password, &user.password_hash) {
                (Some(_), None) | (None, Some(_)) => {}
                (None, None) => return Err(invalid("one of password or password_hash is required")),
                (Some(_), Some(_)) => {
                    return Err(invalid("password and password_hash are mutually exclusive"));
                }
            }
        }

        Ok(())
    }

    /// Address to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(path: &str) -> Args {
        Args {
            config: path.to_string(),
            host: None,
            port: None,
            validate: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.log_level, "info");
        assert!(config.auth.users.is_empty());
        assert!(config.auth.session_ttl().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("port: 9000\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml_str("").unwrap();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = AppConfig::from_yaml_str("prot: 9000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file_with_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "host: 0.0.0.0\nport: 9000\nauth:\n  session_ttl_secs: 60\n  users:\n    - username: admin\n      password: secret"
        )
        .unwrap();

        let mut args = args(file.path().to_str().unwrap());
        args.port = Some(9100);

        let config = AppConfig::load(&args).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9100");
        assert_eq!(config.auth.users.len(), 1);
        assert_eq!(config.auth.session_ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let config = AppConfig::load(&args(path.to_str().unwrap())).unwrap();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_user_requires_exactly_one_secret() {
        let yaml = "auth:\n  users:\n    - username: admin\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::User { .. })));

        let yaml = "auth:\n  users:\n    - username: admin\n      password: a\n      password_hash: b\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::User { .. })));
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let yaml = "auth:\n  users:\n    - username: a\n      password: x\n    - username: a\n      password: y\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid user 'a': declared more than once");
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = AppConfig::from_yaml_str("auth:\n  session_ttl_secs: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_user_debug_redacts_secrets() {
        let user = UserConfig {
            username: "admin".to_string(),
            password: Some("hunter2".to_string()),
            password_hash: None,
        };
        let debug = format!("{:?}", user);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_yaml_serialization() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.bind_address(), config.bind_address());
    }
}
