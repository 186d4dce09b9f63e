//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `BOOKING_DESK_CONFIG`)
//! and are then overridden by environment variables, so secrets never need to
//! live in the file.

use crate::core::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "BOOKING_DESK_CONFIG";

/// Longest accepted session lifetime: one year
pub const MAX_SESSION_TTL_MINUTES: u64 = 365 * 24 * 60;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`
    pub bind: String,

    /// Origins allowed by CORS; empty means any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Supervisor account and session lifetime
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub session_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "supervisor".to_string(),
            password: String::new(),
            session_ttl_minutes: 30 * 24 * 60,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .finish()
    }
}

/// Which repository backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Airtable,
}

/// Connection settings for the hosted table
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirtableConfig {
    pub base_url: String,
    pub base_id: String,
    pub table: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.airtable.com/v0".to_string(),
            base_id: String::new(),
            table: "Bookings".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("base_url", &self.base_url)
            .field("base_id", &self.base_id)
            .field("table", &self.table)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub airtable: AirtableConfig,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// File (if `BOOKING_DESK_CONFIG` is set), then environment, then validation
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overwrite settings from variables returned by `lookup`
    ///
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get("SUPERVISOR_USERNAME") {
            self.auth.username = value;
        }
        if let Some(value) = get("SUPERVISOR_PASSWORD") {
            self.auth.password = value;
        }
        if let Some(value) = get("AIRTABLE_API_KEY") {
            self.storage.airtable.api_key = value;
        }
        if let Some(value) = get("AIRTABLE_BASE_ID") {
            self.storage.airtable.base_id = value;
        }
        if let Some(value) = get("AIRTABLE_TABLE") {
            self.storage.airtable.table = value;
        }
        if let Some(value) = get("BOOKING_DESK_BIND") {
            self.server.bind = value;
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.username.trim().is_empty() {
            return Err(invalid("auth.username", "must not be empty"));
        }
        if self.auth.password.is_empty() {
            return Err(invalid(
                "auth.password",
                "must be set (SUPERVISOR_PASSWORD)",
            ));
        }
        if self.auth.session_ttl_minutes == 0 {
            return Err(invalid("auth.session_ttl_minutes", "must be greater than 0"));
        }
        if self.auth.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            return Err(invalid(
                "auth.session_ttl_minutes",
                "must not exceed 525600 (one year)",
            ));
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(invalid("server.bind", "must be a socket address"));
        }
        if self.storage.backend == StorageBackend::Airtable {
            let airtable = &self.storage.airtable;
            if airtable.base_id.trim().is_empty() {
                return Err(invalid(
                    "storage.airtable.base_id",
                    "must be set (AIRTABLE_BASE_ID)",
                ));
            }
            if airtable.api_key.trim().is_empty() {
                return Err(invalid(
                    "storage.airtable.api_key",
                    "must be set (AIRTABLE_API_KEY)",
                ));
            }
            if airtable.table.trim().is_empty() {
                return Err(invalid("storage.airtable.table", "must not be empty"));
            }
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        let minutes = i64::try_from(self.auth.session_ttl_minutes).unwrap_or(i64::MAX / 60_000);
        chrono::Duration::try_minutes(minutes).unwrap_or(chrono::Duration::MAX)
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
