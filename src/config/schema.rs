//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Longest accepted token lifetime: one year
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Feature flags, e.g. `ai_matching = true`
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

/// Application identity and backend location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_environment")]
    pub environment: String,

    /// Base URL of the real backend. Unused by the in-memory credential source.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_app_name() -> String {
    "Handi.jobs".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_environment(),
            api_base_url: default_api_base_url(),
        }
    }
}

/// Token encoding used for bearer tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    /// HS256-signed claims
    #[default]
    Signed,
    /// Unsigned base64 JSON, as issued by the mock backend
    Opaque,
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token_format: TokenFormat,

    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// bcrypt cost for newly registered passwords
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,

    /// Artificial delay applied by the in-memory credential source
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

fn default_token_secret() -> String {
    "handijobs-secret-key-change-in-production".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_password_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_format: TokenFormat::default(),
            token_secret: default_token_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            password_cost: default_password_cost(),
            simulated_latency_ms: 0,
        }
    }
}

/// Durable client storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Prefix for every storage key. Auth and preference keys live in
    /// separate sub-namespaces below it.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./.handijobs/storage.json")
}

fn default_namespace() -> String {
    "handijobs".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            namespace: default_namespace(),
        }
    }
}

impl StorageConfig {
    /// Key of the bearer token slot shared by the auth service and the session store
    pub fn token_key(&self) -> String {
        format!("{}.auth.token", self.namespace)
    }

    /// Prefix for UI preferences (onboarding, theme, ...)
    pub fn preferences_prefix(&self) -> String {
        format!("{}.prefs.", self.namespace)
    }
}

impl Config {
    /// Whether a feature flag is switched on. Unknown flags are off.
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    /// Reject settings that would break the session lifecycle
    pub fn validate(&self) -> Result<()> {
        self.token_ttl().map(|_| ())
    }

    /// Token lifetime as a chrono duration. Must be positive and at most
    /// [`MAX_TOKEN_TTL_HOURS`].
    pub fn token_ttl(&self) -> Result<chrono::Duration> {
        let hours = self.auth.token_ttl_hours;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
            return Err(Error::Config(format!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS, hours
            )));
        }
        chrono::TimeDelta::try_hours(hours).ok_or_else(|| {
            Error::Config(format!("auth.token_ttl_hours out of range: {}", hours))
        })
    }
}
